use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` starts from struct defaults, applies the optional config
/// file, then lets `CADENZA__` environment variables override both.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.watcher.tick_ms == 0 {
            return Err("watcher.tick_ms must be >= 1".to_string());
        }
        let guards = [
            ("watcher.stop_guard_secs", self.watcher.stop_guard_secs),
            ("watcher.loop_guard_secs", self.watcher.loop_guard_secs),
            ("watcher.switch_epsilon_secs", self.watcher.switch_epsilon_secs),
        ];
        for (name, value) in guards {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number"));
            }
        }
        if self.boundary.min_segment_secs == 0 {
            return Err("boundary.min_segment_secs must be >= 1".to_string());
        }
        if self.boundary.default_window_secs == 0 {
            return Err("boundary.default_window_secs must be >= 1".to_string());
        }
        if self.controls.window_step_secs == 0 {
            return Err("controls.window_step_secs must be >= 1".to_string());
        }
        Ok(())
    }

    /// Render the effective settings as TOML (used by `--print-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("cadenza").join("config.toml"))
}
