//! The playback session: single owner of the backend and of all playback state.
//!
//! Every command cancels the boundary watcher before it issues a new seek or
//! load, so a tick scheduled against an old boundary can never act on the
//! new position.

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info};

use crate::catalog::{Anchor, Catalog, Recording};
use crate::config::{Settings, SwitchPolicy};

use super::backend::{BackendEvent, LoadRequest, MediaBackend};
use super::boundary::{BoundaryRules, Window, carry_position, resolve_end, resolve_window};
use super::error::SessionError;
use super::mode::Mode;
use super::transport::{TransportState, WatcherCommand};
use super::watcher::{BoundaryWatcher, Discipline, WatchAction, WatcherTiming};

/// Tunables the session needs from `Settings`.
#[derive(Copy, Clone, Debug)]
pub struct SessionOptions {
    pub switch_policy: SwitchPolicy,
    pub timing: WatcherTiming,
    pub rules: BoundaryRules,
    /// Carried-over positions stay this far inside the window end.
    pub switch_epsilon: f64,
    pub autoplay: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SessionOptions {
    fn from(s: &Settings) -> Self {
        Self {
            switch_policy: s.playback.switch_policy,
            timing: WatcherTiming::from(&s.watcher),
            rules: BoundaryRules::from(&s.boundary),
            switch_epsilon: s.watcher.switch_epsilon_secs,
            autoplay: s.playback.autoplay,
        }
    }
}

/// Observable state changes, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RecordingActivated(String),
    AnchorActivated(Option<String>),
    ModeChanged(Mode),
}

pub struct PlaybackSession<B: MediaBackend> {
    catalog: Catalog,
    options: SessionOptions,
    backend: Option<B>,

    recording_id: String,
    anchor_id: Option<String>,
    mode: Mode,
    window: Option<Window>,

    transport: TransportState,
    watcher: BoundaryWatcher,
    events: VecDeque<SessionEvent>,
}

impl<B: MediaBackend> PlaybackSession<B> {
    /// Create a session with the first recording selected and no anchor.
    pub fn new(catalog: Catalog, options: SessionOptions, mode: Mode) -> Self {
        let recording_id = catalog.first_recording().id.clone();
        Self {
            catalog,
            watcher: BoundaryWatcher::new(options.timing.tick),
            options,
            backend: None,
            recording_id,
            anchor_id: None,
            mode,
            window: None,
            transport: TransportState::Idle,
            events: VecDeque::new(),
        }
    }

    /// Hand the backend to the session and load the current recording from 0.
    pub fn attach_backend(&mut self, mut backend: B) {
        let recording = self.current_recording().clone();
        debug!("attaching backend, loading '{}'", recording.id);
        backend.load(&recording.source, LoadRequest::from_start(0.0));
        if !self.options.autoplay {
            backend.pause();
        }
        self.backend = Some(backend);
        self.events
            .push_back(SessionEvent::RecordingActivated(recording.id));
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    /// Give the backend back, e.g. to shut it down.
    pub fn detach_backend(&mut self) -> Option<B> {
        self.watcher.cancel();
        self.backend.take()
    }

    // --- observable state ---

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_recording(&self) -> &Recording {
        self.catalog
            .recording(&self.recording_id)
            .unwrap_or_else(|| self.catalog.first_recording())
    }

    /// Anchors selectable in the current mode.
    pub fn anchors(&self) -> &[Anchor] {
        self.mode.collection(&self.catalog)
    }

    pub fn current_anchor(&self) -> Option<&Anchor> {
        let id = self.anchor_id.as_deref()?;
        self.anchors().iter().find(|a| a.id == id)
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn watcher_active(&self) -> bool {
        self.watcher.is_active()
    }

    pub fn watcher_discipline(&self) -> Option<&Discipline> {
        self.watcher.discipline()
    }

    /// Position the live watcher enforces: the resolved segment end for
    /// stop-at-end, the window end for loops.
    pub fn watcher_boundary(&self) -> Option<f64> {
        match self.watcher.discipline()? {
            Discipline::StopAtEnd { anchor_id } => self.segment_end(anchor_id),
            Discipline::LoopWithin { window } => Some(window.end()),
        }
    }

    pub fn position(&self) -> Option<f64> {
        self.backend.as_ref()?.current_time()
    }

    pub fn duration(&self) -> Option<f64> {
        self.backend.as_ref()?.duration()
    }

    /// Take the queued observable events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    // --- commands ---

    /// Switch to another recording of the same work.
    pub fn select_recording(&mut self, id: &str) -> Result<(), SessionError> {
        if id == self.recording_id {
            return Ok(());
        }
        let recording = self
            .catalog
            .recording(id)
            .cloned()
            .ok_or_else(|| SessionError::RecordingNotFound(id.to_string()))?;
        if self.backend.is_none() {
            return Err(SessionError::BackendNotReady);
        }

        let start_sec = self.switch_target();
        let end_sec = match (self.mode, self.window) {
            (Mode::Window, Some(w)) if self.backend_supports_end_bound() => Some(w.end()),
            _ => None,
        };
        debug!(
            "switching to '{}' at {start_sec:.2}s ({} mode)",
            recording.id, self.mode
        );

        if let Some(backend) = self.backend.as_mut() {
            backend.load(&recording.source, LoadRequest { start_sec, end_sec });
        }
        self.recording_id = recording.id.clone();
        self.events
            .push_back(SessionEvent::RecordingActivated(recording.id));
        Ok(())
    }

    /// Activate an anchor of the current mode's collection.
    pub fn jump_to_anchor(&mut self, id: &str) -> Result<(), SessionError> {
        let anchor = self
            .anchors()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| SessionError::AnchorNotFound(id.to_string()))?;
        if self.backend.is_none() {
            return Err(SessionError::BackendNotReady);
        }

        self.watcher.cancel();
        self.anchor_id = Some(anchor.id.clone());
        self.events
            .push_back(SessionEvent::AnchorActivated(Some(anchor.id.clone())));

        match self.mode {
            Mode::Segment => {
                let start = anchor.start_floor();
                debug!("segment '{}' from {start}s", anchor.id);
                if let Some(backend) = self.backend.as_mut() {
                    backend.seek(start);
                    backend.play();
                }
                self.watcher.start(
                    Discipline::StopAtEnd {
                        anchor_id: anchor.id,
                    },
                    Instant::now(),
                );
            }
            Mode::Window => {
                let new = resolve_window(&anchor, &self.options.rules);
                let pos = match (self.window, self.position()) {
                    (Some(old), Some(t)) => {
                        carry_position(&old, &new, t, self.options.switch_epsilon)
                    }
                    _ => new.start(),
                };
                debug!(
                    "window '{}' {}..{} at {pos:.2}s",
                    anchor.id,
                    new.start(),
                    new.end()
                );
                self.window = Some(new);
                self.move_within_window(new, pos);
                if let Some(backend) = self.backend.as_mut() {
                    backend.play();
                }
                self.watcher
                    .start(Discipline::LoopWithin { window: new }, Instant::now());
            }
            // Full-piece mode has no anchors, so lookup already failed.
            Mode::FullPiece => {}
        }
        Ok(())
    }

    /// Drop the selected segment and play the whole piece from 0.
    pub fn play_full_piece_from_start(&mut self) -> Result<(), SessionError> {
        if self.mode == Mode::Window {
            return Err(SessionError::ModeMismatch {
                operation: "full-piece playback",
                mode: self.mode,
            });
        }

        self.watcher.cancel();
        self.anchor_id = None;
        self.events.push_back(SessionEvent::AnchorActivated(None));
        if let Some(backend) = self.backend.as_mut() {
            debug!("full piece from start");
            backend.seek(0.0);
            backend.play();
        }
        Ok(())
    }

    /// Replace the active window with `start..end`.
    ///
    /// With `keep_relative`, the listener keeps the same fractional place in
    /// the new window as they had in the old one.
    pub fn resize_window(
        &mut self,
        start: f64,
        end: f64,
        keep_relative: bool,
    ) -> Result<(), SessionError> {
        if self.mode != Mode::Window {
            return Err(SessionError::ModeMismatch {
                operation: "window resize",
                mode: self.mode,
            });
        }
        let new =
            Window::new(start.max(0.0), end).ok_or(SessionError::InvalidWindow { start, end })?;
        if self.backend.is_none() {
            return Err(SessionError::BackendNotReady);
        }

        self.watcher.cancel();
        let pos = match (keep_relative, self.window, self.position()) {
            (true, Some(old), Some(t)) => carry_position(&old, &new, t, self.options.switch_epsilon),
            _ => new.start(),
        };
        debug!("window resized to {}..{} at {pos:.2}s", new.start(), new.end());
        self.window = Some(new);
        self.move_within_window(new, pos);
        if self.transport.is_playing() {
            self.watcher
                .start(Discipline::LoopWithin { window: new }, Instant::now());
        }
        Ok(())
    }

    /// Shift the active window edges by the given deltas, keeping the
    /// relative position.
    pub fn nudge_window(&mut self, delta_start: f64, delta_end: f64) -> Result<(), SessionError> {
        if self.mode != Mode::Window {
            return Err(SessionError::ModeMismatch {
                operation: "window resize",
                mode: self.mode,
            });
        }
        let Some(w) = self.window else {
            return Err(SessionError::NoWindow);
        };
        self.resize_window(w.start() + delta_start, w.end() + delta_end, true)
    }

    /// Switch playback discipline. Never resumes playback by itself.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.watcher.cancel();
        self.anchor_id = None;
        self.window = None;
        self.mode = mode;
        debug!("mode changed to {mode}");
        self.events.push_back(SessionEvent::ModeChanged(mode));
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        let backend = self.backend.as_mut().ok_or(SessionError::BackendNotReady)?;
        self.watcher.cancel();
        backend.pause();
        Ok(())
    }

    /// Resume playback. The watcher is re-armed by the backend's `Playing` event.
    ///
    /// After the media has ended, a selected segment or window restarts
    /// from its own start rather than from the top of the piece.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let restart = match (self.transport, self.mode) {
            (TransportState::Ended, Mode::Segment) => self.current_anchor().map(Anchor::start_floor),
            (TransportState::Ended, Mode::Window) => self.window.map(|w| w.start()),
            _ => None,
        };
        let backend = self.backend.as_mut().ok_or(SessionError::BackendNotReady)?;
        if let Some(start) = restart {
            debug!("restarting at {start}s after the end of the media");
            backend.seek(start);
        }
        backend.play();
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        if self.transport.is_playing() {
            self.pause()
        } else {
            self.resume()
        }
    }

    // --- backend callbacks and timer ---

    /// Feed a backend state change into the transport state machine.
    ///
    /// A window that runs past the end of the media keeps looping: the end
    /// of the media sends playback back to the window start.
    pub fn on_backend_event(&mut self, event: BackendEvent) {
        match self.transport.on_event(event) {
            WatcherCommand::Arm => self.arm_watcher(),
            WatcherCommand::Disarm => {
                if self.watcher.cancel() {
                    debug!("watcher disarmed on {event:?}");
                }
            }
        }
        if event == BackendEvent::Ended {
            if let (Mode::Window, Some(window)) = (self.mode, self.window) {
                // A window starting at or past the end has nothing to loop.
                if self.duration().is_some_and(|d| window.start() >= d) {
                    return;
                }
                if let Some(backend) = self.backend.as_mut() {
                    info!("media ended inside window, looping to {}s", window.start());
                    backend.seek(window.start());
                    backend.play();
                }
            }
        }
    }

    /// Run a watcher tick if one is due at `now`.
    pub fn poll_watcher(&mut self, now: Instant) -> Option<WatchAction> {
        if self.watcher.poll(now) {
            self.tick()
        } else {
            None
        }
    }

    /// Evaluate the live watcher once, regardless of its schedule.
    ///
    /// A position that cannot be read skips the tick.
    pub fn tick(&mut self) -> Option<WatchAction> {
        let discipline = self.watcher.discipline()?.clone();
        let t = self.position()?;

        let end = match &discipline {
            Discipline::StopAtEnd { anchor_id } => match self.segment_end(anchor_id) {
                Some(end) => Some(end),
                None => {
                    self.watcher.cancel();
                    return None;
                }
            },
            // The backend clock stops at the media end, so a window running
            // past it must wrap there.
            Discipline::LoopWithin { window } => self
                .duration()
                .filter(|d| d.is_finite() && *d > window.start()),
        };

        let action = discipline.evaluate(t, end, &self.options.timing)?;
        match action {
            WatchAction::Pause => {
                info!("segment end reached at {t:.2}s, pausing");
                self.watcher.cancel();
                if let Some(backend) = self.backend.as_mut() {
                    backend.pause();
                }
            }
            WatchAction::SeekTo(start) => {
                info!("window end reached at {t:.2}s, looping to {start}s");
                if let Some(backend) = self.backend.as_mut() {
                    backend.seek(start);
                }
            }
        }
        Some(action)
    }

    // --- helpers ---

    fn arm_watcher(&mut self) {
        let discipline = match (self.mode, &self.anchor_id, self.window) {
            (Mode::Segment, Some(anchor_id), _) => Discipline::StopAtEnd {
                anchor_id: anchor_id.clone(),
            },
            (Mode::Window, _, Some(window)) => Discipline::LoopWithin { window },
            // Unconstrained playback: nothing to enforce.
            _ => {
                self.watcher.cancel();
                return;
            }
        };
        let generation = self.watcher.start(discipline, Instant::now());
        debug!("watch {generation} armed");
    }

    fn segment_end(&self, anchor_id: &str) -> Option<f64> {
        let collection = Mode::Segment.collection(&self.catalog);
        let anchor = collection.iter().find(|a| a.id == anchor_id)?;
        Some(resolve_end(
            anchor,
            collection,
            self.duration(),
            &self.options.rules,
        ))
    }

    /// Where a recording switch should start playing.
    fn switch_target(&self) -> f64 {
        if self.mode == Mode::Window {
            return match (self.window, self.position()) {
                (Some(w), Some(t)) => w.clamp(t, self.options.switch_epsilon),
                (Some(w), None) => w.start(),
                (None, _) => 0.0,
            };
        }

        let reset = self.current_anchor().map_or(0.0, Anchor::start_floor);
        match self.options.switch_policy {
            SwitchPolicy::AnchorReset => reset,
            SwitchPolicy::PreserveElapsed => self.position().map_or(reset, |t| t.max(0.0)),
        }
    }

    fn backend_supports_end_bound(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.supports_end_bound())
    }

    /// Move to `pos` inside `window`: a bounded reload when the backend can
    /// enforce the end itself, a plain seek otherwise.
    fn move_within_window(&mut self, window: Window, pos: f64) {
        let source = self.current_recording().source.clone();
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if backend.supports_end_bound() {
            backend.load(
                &source,
                LoadRequest {
                    start_sec: pos,
                    end_sec: Some(window.end()),
                },
            );
        } else {
            backend.seek(pos);
        }
    }
}
