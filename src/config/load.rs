use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` layers environment variables (prefix `SEGUE__`) over an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SEGUE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Check value ranges the runtime relies on.
    pub fn validate(&self) -> Result<(), String> {
        let tick = self.playback.tick_interval_ms;
        if !(20..=2000).contains(&tick) {
            return Err(format!(
                "playback.tick_interval_ms must be within 20..=2000, got {tick}"
            ));
        }
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err("audio.initial_volume must be within [0.0, 1.0]".to_string());
        }
        let seek = self.controls.seek_step;
        if !(seek > 0.0 && seek <= 1.0) {
            return Err("controls.seek_step must be within (0.0, 1.0]".to_string());
        }
        let vol = self.controls.volume_step;
        if !(vol > 0.0 && vol <= 1.0) {
            return Err("controls.volume_step must be within (0.0, 1.0]".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SEGUE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SEGUE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/segue/config.toml`
/// or `~/.config/segue/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("segue").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/segue/segue.log` or
/// `~/.local/state/segue/segue.log`. Logging never goes to the terminal while
/// the player owns it.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("segue").join("segue.log"))
}
