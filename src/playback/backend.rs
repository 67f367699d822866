use crate::catalog::SourceRef;

/// Where a freshly loaded source should start (and optionally stop).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub start_sec: f64,
    /// Only honoured by backends that report `supports_end_bound`.
    pub end_sec: Option<f64>,
}

impl LoadRequest {
    pub fn from_start(start_sec: f64) -> Self {
        Self {
            start_sec,
            end_sec: None,
        }
    }
}

/// State changes reported by the media backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackendEvent {
    Playing,
    Paused,
    Ended,
}

/// The media backend the playback session drives.
///
/// Commands are fire-and-forget: the session does not wait for them to take
/// effect and learns about play/pause transitions only through
/// `BackendEvent`s. `load` starts playback at the requested position.
pub trait MediaBackend {
    fn load(&mut self, source: &SourceRef, request: LoadRequest);
    fn seek(&mut self, sec: f64);
    fn play(&mut self);
    fn pause(&mut self);

    /// Current position in seconds; `None` when it cannot be read right now.
    fn current_time(&self) -> Option<f64>;

    /// Total length of the loaded source, if known.
    fn duration(&self) -> Option<f64>;

    /// Whether `LoadRequest::end_sec` is enforced natively.
    fn supports_end_bound(&self) -> bool {
        false
    }
}
