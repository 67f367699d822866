//! Polled boundary watcher.
//!
//! The backend has no notion of segments or loops, so boundaries are
//! enforced by checking the position on a fixed interval while playing.
//! Only one watch is live at a time: starting a new one replaces the old
//! one, and a replaced or cancelled watch never comes due again.

use std::time::{Duration, Instant};

use crate::config::WatcherSettings;

use super::boundary::Window;

/// Tick interval and guard bands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WatcherTiming {
    pub tick: Duration,
    /// Pause once `t >= end - stop_guard`.
    pub stop_guard: f64,
    /// Loop once `t >= window.end - loop_guard`.
    pub loop_guard: f64,
}

impl Default for WatcherTiming {
    fn default() -> Self {
        Self::from(&WatcherSettings::default())
    }
}

impl From<&WatcherSettings> for WatcherTiming {
    fn from(s: &WatcherSettings) -> Self {
        Self {
            tick: Duration::from_millis(s.tick_ms.max(1)),
            stop_guard: s.stop_guard_secs,
            loop_guard: s.loop_guard_secs,
        }
    }
}

/// What the watcher enforces.
#[derive(Clone, Debug, PartialEq)]
pub enum Discipline {
    /// Pause at the end of the segment started from `anchor_id`.
    StopAtEnd { anchor_id: String },
    /// Jump back to the window start shortly before its end.
    LoopWithin { window: Window },
}

/// Backend command produced by a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WatchAction {
    Pause,
    SeekTo(f64),
}

impl Discipline {
    /// Decide what to do at time `t`. The caller resolves `end` fresh on
    /// every tick: the segment end for `StopAtEnd` (required), and for
    /// `LoopWithin` the media end, which cuts a window short when known.
    pub fn evaluate(
        &self,
        t: f64,
        end: Option<f64>,
        timing: &WatcherTiming,
    ) -> Option<WatchAction> {
        match self {
            Discipline::StopAtEnd { .. } => {
                let end = end?;
                (t >= end - timing.stop_guard).then_some(WatchAction::Pause)
            }
            Discipline::LoopWithin { window } => {
                let end = end.map_or(window.end(), |e| e.min(window.end()));
                (t >= end - timing.loop_guard).then_some(WatchAction::SeekTo(window.start()))
            }
        }
    }
}

#[derive(Debug)]
struct ActiveWatch {
    discipline: Discipline,
    next_due: Instant,
}

/// A single repeating timer carrying the current discipline.
#[derive(Debug)]
pub struct BoundaryWatcher {
    interval: Duration,
    generation: u64,
    active: Option<ActiveWatch>,
}

impl BoundaryWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            active: None,
        }
    }

    /// Start watching with `discipline`, replacing any live watch.
    /// Returns the generation of the new watch.
    pub fn start(&mut self, discipline: Discipline, now: Instant) -> u64 {
        self.cancel();
        self.generation += 1;
        self.active = Some(ActiveWatch {
            discipline,
            next_due: now + self.interval,
        });
        self.generation
    }

    /// Stop the live watch, if any. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn discipline(&self) -> Option<&Discipline> {
        self.active.as_ref().map(|w| &w.discipline)
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(watch) = self.active.as_mut() else {
            return false;
        };
        if now < watch.next_due {
            return false;
        }
        // Skip missed ticks instead of firing a burst.
        while watch.next_due <= now {
            watch.next_due += self.interval;
        }
        true
    }
}
