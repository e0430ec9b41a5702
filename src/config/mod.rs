//! # Configuration Management Module
//!
//! TOML configuration for the Ascend server: where to listen, where the game document
//! lives, how to log, and the defaults used when a fresh document is created.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ascend::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     config.validate()?;
//!     println!("Listening on {}", config.server.bind);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:5000"
//!
//! [storage]
//! data_dir = "./data"
//! state_file = "game_state.json"
//!
//! [logging]
//! level = "info"
//! file = "ascend.log"
//!
//! [game]
//! player_name = "HUNTER"
//! timer_duration_secs = 86400
//! ```
//!
//! CLI flags take precedence over the file; the file takes precedence over defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::fs;

use crate::engine::types::Settings;
use crate::validation::validate_player_name;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub game: GameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_state_file() -> String {
    "game_state.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            state_file: default_state_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("ascend.log".to_string()),
        }
    }
}

/// Values used when a fresh game document is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub player_name: String,
    /// Countdown duration restored on every daily reset.
    #[serde(default = "default_timer_duration")]
    pub timer_duration_secs: u32,
}

fn default_timer_duration() -> u32 {
    24 * 3600
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "HUNTER".to_string(),
            timer_duration_secs: default_timer_duration(),
        }
    }
}

impl GameConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            timer_duration_secs: self.timer_duration_secs,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Check values that would otherwise fail later at startup.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        let state_file = self.storage.state_file.trim();
        if state_file.is_empty() || state_file.contains('/') || state_file.contains('\\') {
            return Err(anyhow!(
                "storage.state_file must be a plain file name, got '{}'",
                self.storage.state_file
            ));
        }
        if self.game.timer_duration_secs == 0 {
            return Err(anyhow!("game.timer_duration_secs must be greater than zero"));
        }
        validate_player_name(&self.game.player_name)
            .map_err(|e| anyhow!("game.player_name: {}", e))?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| anyhow!("Invalid server.bind '{}': {}", self.server.bind, e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            game: GameConfig::default(),
        }
    }
}
