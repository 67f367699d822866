//! Logger setup.
//!
//! Everything logs through the `log` facade. A TUI owns the terminal, so
//! output never goes to stderr: it is appended to `[logging] file`, or to
//! `$XDG_STATE_HOME/cadenza/cadenza.log` when that is unset. Without a
//! usable state directory, or when it cannot be written, the output is
//! dropped.

use std::env;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::config::LoggingSettings;

/// Install the global logger. `RUST_LOG` wins over `settings.level`.
pub fn init(settings: &LoggingSettings) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()));

    let target = if let Some(path) = configured_file(settings) {
        Target::Pipe(Box::new(open_append(&path)?))
    } else if let Some(path) = default_log_path(env::var_os("XDG_STATE_HOME"), env::var_os("HOME")) {
        let opened = match path.parent() {
            Some(dir) => fs::create_dir_all(dir).and_then(|()| open_append(&path)),
            None => open_append(&path),
        };
        // An unwritable default location must not stop the player.
        match opened {
            Ok(file) => Target::Pipe(Box::new(file)),
            Err(_) => Target::Pipe(Box::new(io::sink())),
        }
    } else {
        Target::Pipe(Box::new(io::sink()))
    };
    builder.target(target);

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}

/// `[logging] file`, ignoring a blank value. Its directory must exist.
fn configured_file(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .file
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PathBuf::from)
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn default_log_path(state_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let state_home = match (state_home.filter(|s| !s.is_empty()), home) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".local").join("state"),
        _ => return None,
    };
    Some(state_home.join("cadenza").join("cadenza.log"))
}
