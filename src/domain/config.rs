//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix login, navigator behaviour and search settings.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::application::navigator::{
    NavigatorOptions, NavigatorStyle, Timeouts, UpdateFailurePolicy,
};

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.navigator.hard_timeout_secs == 0 || self.navigator.idle_timeout_secs == 0 {
            bail!("navigator timeouts must be greater than zero");
        }
        if self.search.result_limit == 0 {
            bail!("search.result_limit must be greater than zero");
        }
        Ok(())
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// How result navigators behave once posted.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NavigatorConfig {
    pub hard_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub on_update_failure: UpdateFailurePolicy,
    pub style: NavigatorStyle,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            hard_timeout_secs: 300,
            idle_timeout_secs: 60,
            on_update_failure: UpdateFailurePolicy::default(),
            style: NavigatorStyle::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn options(&self) -> NavigatorOptions {
        NavigatorOptions {
            timeouts: Timeouts {
                hard: Duration::from_secs(self.hard_timeout_secs),
                idle: Duration::from_secs(self.idle_timeout_secs),
            },
            style: self.style.clone(),
            on_update_failure: self.on_update_failure,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub result_limit: usize,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: 10,
            cache_ttl_secs: 600,
            request_timeout_secs: 15,
            user_agent: concat!("scout-bot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SearchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SystemConfig {
    pub command_prefix: String,
    /// Rooms the bot answers in. Empty means every joined room.
    pub allowed_rooms: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            command_prefix: ".".to_string(),
            allowed_rooms: Vec::new(),
        }
    }
}

impl SystemConfig {
    pub fn allows_room(&self, room_id: &str) -> bool {
        self.allowed_rooms.is_empty() || self.allowed_rooms.iter().any(|r| r == room_id)
    }
}
