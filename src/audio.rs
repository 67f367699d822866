//! Audio playback subsystem.
//!
//! `AudioPlayer` is the `rodio` implementation of the playback session's
//! `MediaBackend`. Decoding and output run on a dedicated thread fed by an
//! `mpsc` command channel; position and duration are read from a shared
//! `PlaybackHandle`, and state changes come back as `BackendEvent`s on a
//! second channel.

mod error;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;

#[cfg(test)]
mod tests;
