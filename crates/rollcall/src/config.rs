//! Configuration management for rollcall.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::link::{LinkComposer, DEFAULT_BASE_URL};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "rollcall";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROLLCALL_`)
/// 2. TOML config file at `~/.config/rollcall/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Messaging link configuration.
    pub messaging: MessagingConfig,
    /// How links are opened.
    pub dispatch: DispatchConfig,
    /// Connectivity gate configuration.
    pub connectivity: ConnectivityConfig,
    /// Offline game configuration.
    pub game: GameConfig,
}

/// Messaging-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Deep-link host that links are composed against.
    pub base_url: String,
    /// The sender's own phone number.
    ///
    /// Only shown as a reminder: bulk recipients need this number in their
    /// contacts for messages to arrive.
    pub sender_phone: String,
}

/// Dispatch-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Command used to open links instead of the platform default.
    /// The link is appended as the last argument.
    pub opener: Option<String>,
    /// Print links instead of opening them.
    pub dry_run: bool,
}

/// How the connectivity gate gets its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityMode {
    /// Poll the probe address.
    #[default]
    Probe,
    /// Always online.
    Online,
    /// Always offline.
    Offline,
}

impl std::fmt::Display for ConnectivityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probe => write!(f, "probe"),
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Connectivity-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Where the gate's signal comes from.
    pub mode: ConnectivityMode,
    /// `host:port` probed for reachability.
    pub probe_addr: String,
    /// Probe connection timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Interval between probes in milliseconds.
    pub poll_interval_ms: u64,
}

/// Offline game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Largest number the secret can be.
    pub upper_bound: u32,
    /// Attempts per round.
    pub max_guesses: u32,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sender_phone: "964".to_string(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            mode: ConnectivityMode::Probe,
            probe_addr: "wa.me:443".to_string(),
            probe_timeout_ms: 3_000,
            poll_interval_ms: 5_000,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            upper_bound: 100,
            max_guesses: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ROLLCALL_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ROLLCALL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base_url = &self.messaging.base_url;
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::ConfigValidation {
                message: format!("base_url must start with http:// or https:// (got {base_url})"),
            });
        }

        if let Some(opener) = &self.dispatch.opener {
            if opener.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "opener must not be empty when set".to_string(),
                });
            }
        }

        if self.connectivity.probe_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "probe_timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.connectivity.poll_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        match self.connectivity.probe_addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
            _ => {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "probe_addr must be host:port (got {})",
                        self.connectivity.probe_addr
                    ),
                });
            }
        }

        if self.game.upper_bound == 0 {
            return Err(Error::ConfigValidation {
                message: "upper_bound must be at least 1".to_string(),
            });
        }

        if self.game.max_guesses == 0 {
            return Err(Error::ConfigValidation {
                message: "max_guesses must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Build the link composer for the configured host.
    #[must_use]
    pub fn link_composer(&self) -> LinkComposer {
        LinkComposer::new(&self.messaging.base_url)
    }

    /// Get the probe timeout as a Duration.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.connectivity.probe_timeout_ms)
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity.poll_interval_ms)
    }
}
