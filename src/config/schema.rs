use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub watcher: WatcherSettings,
    pub boundary: BoundarySettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Mode the session starts in.
    pub initial_mode: ModeSetting,
    /// What happens to the position when switching recordings in segment mode.
    pub switch_policy: SwitchPolicy,
    /// Start playing as soon as the first recording is loaded.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_mode: ModeSetting::Segment,
            switch_policy: SwitchPolicy::AnchorReset,
            autoplay: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSetting {
    #[serde(alias = "full_piece", alias = "full", alias = "fullpiece")]
    FullPiece,
    #[serde(alias = "segments")]
    Segment,
    #[serde(alias = "windows", alias = "loop")]
    Window,
}

/// Position policy applied by `select_recording` while a segment is selected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchPolicy {
    /// Restart from the selected anchor's start (or 0 without an anchor).
    #[serde(alias = "anchor_reset", alias = "reset")]
    AnchorReset,
    /// Carry the raw elapsed time over to the new recording.
    #[serde(alias = "preserve_elapsed", alias = "preserve")]
    PreserveElapsed,
}

/// Boundary watcher timing. Guard bands are in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Interval between two boundary checks (milliseconds).
    pub tick_ms: u64,
    /// Pause this long before a segment end.
    pub stop_guard_secs: f64,
    /// Jump back this long before a window end.
    pub loop_guard_secs: f64,
    /// Keep a carried-over position at least this far from the window end.
    pub switch_epsilon_secs: f64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            stop_guard_secs: 0.15,
            loop_guard_secs: 0.25,
            switch_epsilon_secs: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoundarySettings {
    /// Shortest segment the resolver will produce (seconds).
    pub min_segment_secs: u64,
    /// Length used when neither an end, a following anchor nor a duration is known.
    pub default_window_secs: u64,
}

impl Default for BoundarySettings {
    fn default() -> Self {
        Self {
            min_segment_secs: 1,
            default_window_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds added/removed when pressing `[`/`]` or `{`/`}`.
    pub window_step_secs: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            window_step_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Render anchor notes next to their labels.
    pub show_notes: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ same bar, another hand ~ ".to_string(),
            show_notes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Append logs to this file instead of the default state-directory log.
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}
