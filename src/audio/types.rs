//! Commands and shared state of the audio thread.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum AudioCmd {
    /// Open `path` and start playing at `start`.
    Load { path: PathBuf, start: Duration },
    /// Jump to an absolute position, keeping the play/pause state.
    Seek(Duration),
    Play,
    Pause,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Playback state shared with the session.
///
/// The position is not ticked by a timer: it is the last known offset plus
/// the wall-clock time since playback (re)started, so reads are exact at
/// any moment.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// File currently loaded, if any.
    pub source: Option<PathBuf>,
    /// Media duration, when the container reports one.
    pub duration: Option<Duration>,
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl PlaybackInfo {
    /// Current position, `None` when nothing is loaded.
    pub fn position(&self) -> Option<Duration> {
        self.source.as_ref()?;
        Some(self.position_at(Instant::now()))
    }

    pub fn position_at(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
        let pos = self.accumulated + running;
        match self.duration {
            Some(d) if pos > d => d,
            _ => pos,
        }
    }

    /// Reset the clock to `pos`, running or not.
    pub(super) fn restart_at(&mut self, pos: Duration, playing: bool, now: Instant) {
        self.accumulated = pos;
        self.started_at = playing.then_some(now);
    }

    /// Stop the clock, keeping the reached position.
    pub(super) fn freeze(&mut self, now: Instant) {
        self.accumulated = self.position_at(now);
        self.started_at = None;
    }

    pub(super) fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
