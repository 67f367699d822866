//! Non-fatal command errors.

use super::mode::Mode;

/// A session command was rejected. Nothing about the session changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("recording not found: {0}")]
    RecordingNotFound(String),

    #[error("anchor not found: {0}")]
    AnchorNotFound(String),

    #[error("media backend is not ready")]
    BackendNotReady,

    #[error("{operation} is not available in {mode} mode")]
    ModeMismatch { operation: &'static str, mode: Mode },

    #[error("invalid window {start}..{end}")]
    InvalidWindow { start: f64, end: f64 },

    #[error("no window selected")]
    NoWindow,
}
