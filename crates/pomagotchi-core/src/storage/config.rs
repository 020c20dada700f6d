//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default timer duration and presets
//! - Tick interval
//! - Notification durations and the undo window
//!
//! Configuration is stored at `~/.config/pomagotchi/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::presenter::NotificationKind;
use crate::timer::SelectedDuration;

pub const CONFIG_FILE: &str = "config.toml";

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    #[serde(default)]
    pub default_seconds: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Durations offered for quick selection.
    #[serde(default = "default_presets")]
    pub presets: Vec<SelectedDuration>,
}

/// Display style for one notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStyle {
    pub duration_ms: u64,
    #[serde(default)]
    pub show_countdown: bool,
}

impl NotificationStyle {
    const fn new(duration_ms: u64, show_countdown: bool) -> Self {
        Self {
            duration_ms,
            show_countdown,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a data reset can be undone. 0 keeps the undo available
    /// until the next reset.
    #[serde(default = "default_undo_window_ms")]
    pub undo_window_ms: u64,
    #[serde(default = "default_success")]
    pub success: NotificationStyle,
    #[serde(default = "default_evolution")]
    pub evolution: NotificationStyle,
    #[serde(default = "default_xp")]
    pub xp: NotificationStyle,
    #[serde(default = "default_warning")]
    pub warning: NotificationStyle,
    #[serde(default = "default_error")]
    pub error: NotificationStyle,
    /// Used for any notification that carries an action.
    #[serde(default = "default_action")]
    pub action: NotificationStyle,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomagotchi/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// The parts of [`Config`] a running session needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub default_duration: SelectedDuration,
    pub tick_period: Duration,
    pub notifications: NotificationConfig,
    pub undo_window: Option<Duration>,
}

// Default functions
fn default_minutes() -> u32 {
    25
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_presets() -> Vec<SelectedDuration> {
    vec![
        SelectedDuration::new(25, 0),
        SelectedDuration::new(15, 0),
        SelectedDuration::new(5, 0),
    ]
}
fn default_undo_window_ms() -> u64 {
    8000
}
fn default_success() -> NotificationStyle {
    NotificationStyle::new(3000, false)
}
fn default_evolution() -> NotificationStyle {
    NotificationStyle::new(5000, false)
}
fn default_xp() -> NotificationStyle {
    NotificationStyle::new(3000, false)
}
fn default_warning() -> NotificationStyle {
    NotificationStyle::new(8000, true)
}
fn default_error() -> NotificationStyle {
    NotificationStyle::new(4000, false)
}
fn default_action() -> NotificationStyle {
    NotificationStyle::new(8000, true)
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            default_seconds: 0,
            tick_interval_ms: default_tick_interval_ms(),
            presets: default_presets(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            undo_window_ms: default_undo_window_ms(),
            success: default_success(),
            evolution: default_evolution(),
            xp: default_xp(),
            warning: default_warning(),
            error: default_error(),
            action: default_action(),
        }
    }
}

impl NotificationConfig {
    /// Style for a notification of `kind`; `with_action` selects the
    /// action style regardless of kind.
    pub fn style(&self, kind: NotificationKind, with_action: bool) -> NotificationStyle {
        if with_action {
            return self.action;
        }
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Evolution => self.evolution,
            NotificationKind::Xp => self.xp,
            NotificationKind::Warning => self.warning,
            NotificationKind::Error => self.error,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Config::default().session_config()
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the data directory or return (and write) the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.default_seconds > 59 {
            return Err(ConfigError::InvalidValue {
                key: "timer.default_seconds".into(),
                message: "must be between 0 and 59".into(),
            });
        }
        if self.default_duration().is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "timer.default_minutes".into(),
                message: "default duration must be longer than zero".into(),
            });
        }
        if self.timer.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn default_duration(&self) -> SelectedDuration {
        SelectedDuration::new(self.timer.default_minutes, self.timer.default_seconds)
    }

    pub fn session_config(&self) -> SessionConfig {
        let undo_window = match self.notifications.undo_window_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        SessionConfig {
            default_duration: self.default_duration(),
            tick_period: Duration::from_millis(self.timer.tick_interval_ms.max(1)),
            notifications: self.notifications.clone(),
            undo_window,
        }
    }
}
