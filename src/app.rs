//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the cursor over the
//! anchor list plus what the playback session last reported as active.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
