use log::warn;

use crate::app::App;
use crate::config;
use crate::playback::{MediaBackend, Mode, PlaybackSession};

use super::cli::Cli;

/// The command line wins over the config file.
pub fn initial_mode(cli: &Cli, settings: &config::Settings) -> Mode {
    cli.mode
        .map(Mode::from)
        .unwrap_or_else(|| settings.playback.initial_mode.into())
}

/// Apply `--recording` once the backend is attached. An unknown id is
/// reported in the status line and playback stays on the first recording.
pub fn apply_initial_recording<B: MediaBackend>(
    cli: &Cli,
    session: &mut PlaybackSession<B>,
    app: &mut App,
) {
    let Some(id) = cli.recording.as_deref() else {
        return;
    };
    if let Err(e) = session.select_recording(id) {
        warn!("--recording {id}: {e}");
        app.set_status(e.to_string());
    }
}
