//! Synchronized segment/window playback engine.
//!
//! The engine maps the logical timeline of a work (segments and comparison
//! windows) onto whichever recording is selected, and enforces segment and
//! window boundaries against a media backend that knows nothing about them.
//!
//! - `boundary`: pure end/window resolution
//! - `watcher`: the polled boundary watcher and its disciplines
//! - `transport`: backend state changes mapped to watcher arm/disarm
//! - `session`: the single owner of the backend and all playback state

mod backend;
mod boundary;
mod error;
mod mode;
mod session;
mod transport;
mod watcher;

pub use backend::{BackendEvent, LoadRequest, MediaBackend};
pub use boundary::Window;
pub use error::SessionError;
pub use mode::Mode;
pub use session::{PlaybackSession, SessionEvent, SessionOptions};
pub use transport::TransportState;
pub use watcher::{Discipline, WatchAction};
