//! TOML-based application configuration.
//!
//! Stores:
//! - Backend base URL
//! - Default focus/break durations and the rep goal
//! - Poll and tick cadences
//!
//! Configuration is stored at `~/.config/focusflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::storage::data_dir;

/// Backend endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Session defaults, used when the CLI flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfigDefaults {
    /// 50 minutes.
    #[serde(default = "default_focus_seconds")]
    pub focus_seconds: u32,
    /// 10 minutes.
    #[serde(default = "default_break_seconds")]
    pub break_seconds: u32,
    /// Fallback exercise goal when the backend cannot report one.
    #[serde(default = "default_rep_goal")]
    pub rep_goal: u32,
}

/// Cadences for the cooperative pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Timer tick period; 0.5-1s keeps the countdown display honest.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Posture status poll during focus.
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
    /// Rep count poll during the break.
    #[serde(default = "default_rep_interval_ms")]
    pub rep_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfigDefaults,
    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_focus_seconds() -> u32 {
    50 * 60
}
fn default_break_seconds() -> u32 {
    10 * 60
}
fn default_rep_goal() -> u32 {
    20
}
fn default_tick_interval_ms() -> u64 {
    500
}
fn default_status_interval_ms() -> u64 {
    1000
}
fn default_rep_interval_ms() -> u64 {
    2000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfigDefaults {
    fn default() -> Self {
        Self {
            focus_seconds: default_focus_seconds(),
            break_seconds: default_break_seconds(),
            rep_goal: default_rep_goal(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            status_interval_ms: default_status_interval_ms(),
            rep_interval_ms: default_rep_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            session: SessionConfigDefaults::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/focusflow"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed or the default
    /// config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Set one known key. Unknown keys are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "backend.base_url" => {
                url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
                self.backend.base_url = value.to_string();
            }
            "session.focus_seconds" => {
                self.session.focus_seconds = value.parse().map_err(|_| {
                    invalid(format!("cannot parse '{value}' as seconds"))
                })?;
            }
            "session.break_seconds" => {
                self.session.break_seconds = value.parse().map_err(|_| {
                    invalid(format!("cannot parse '{value}' as seconds"))
                })?;
            }
            "session.rep_goal" => {
                self.session.rep_goal = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a count")))?;
            }
            "polling.tick_interval_ms" => {
                self.polling.tick_interval_ms = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as milliseconds")))?;
            }
            "polling.status_interval_ms" => {
                self.polling.status_interval_ms = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as milliseconds")))?;
            }
            "polling.rep_interval_ms" => {
                self.polling.rep_interval_ms = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as milliseconds")))?;
            }
            _ => return Err(invalid("unknown config key".to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.base_url, "http://localhost:5000");
        assert_eq!(parsed.session.focus_seconds, 3000);
        assert_eq!(parsed.session.break_seconds, 600);
        assert_eq!(parsed.session.rep_goal, 20);
    }

    #[test]
    fn empty_toml_fills_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.polling.status_interval_ms, 1000);
        assert_eq!(parsed.polling.rep_interval_ms, 2000);
    }

    #[test]
    fn set_known_keys() {
        let mut cfg = Config::default();
        cfg.set("backend.base_url", "http://127.0.0.1:9000").unwrap();
        cfg.set("session.rep_goal", "25").unwrap();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.session.rep_goal, 25);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("session.nonexistent", "1").is_err());
        assert!(cfg.set("backend.base_url", "not a url").is_err());
        assert!(cfg.set("session.focus_seconds", "soon").is_err());
    }
}
