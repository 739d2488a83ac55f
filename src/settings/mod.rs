//! Application configuration
//!
//! Contains the configuration structures for the replay tool.

mod loader;

pub use loader::load_config;

use rcplace_canvas::{CanvasConfig, TOKEN_ENV};
use rcplace_replay::ReplayOptions;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub canvas: CanvasSettings,
    pub replay: ReplaySettings,
}

/// Canvas connection settings
#[derive(Debug, Deserialize)]
pub struct CanvasSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Replay pacing settings
#[derive(Debug, Deserialize)]
pub struct ReplaySettings {
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_pace_ms() -> u64 {
    1
}

impl CanvasSettings {
    /// Build the client configuration, falling back to `PERSONAL_ACCESS_TOKEN`
    /// when no token is configured.
    pub fn into_client_config(self) -> CanvasConfig {
        let token = self
            .token
            .or_else(|| std::env::var(TOKEN_ENV).ok().map(SecretString::from));

        CanvasConfig {
            token,
            ..CanvasConfig::new()
                .with_base_url(self.base_url)
                .with_timeout(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl ReplaySettings {
    /// Replay options with this pacing applied
    pub fn options(&self) -> ReplayOptions {
        ReplayOptions::default().with_pace(Duration::from_millis(self.pace_ms))
    }
}
