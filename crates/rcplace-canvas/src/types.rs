//! Canvas configuration and wire types

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default canvas endpoint (a locally running server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the personal access token
pub const TOKEN_ENV: &str = "PERSONAL_ACCESS_TOKEN";

/// Canvas client configuration
#[derive(Debug)]
pub struct CanvasConfig {
    /// Base URL, without the `/tile` suffix
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<SecretString>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CanvasConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("RCPLACE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let token = std::env::var(TOKEN_ENV).ok().map(SecretString::from);

        Self {
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.token = Some(SecretString::from(token));
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn tile_url(&self) -> String {
        format!("{}/tile", self.base_url)
    }
}

/// Body of `POST /tile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequest {
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
    /// Palette color name
    pub color: String,
}

/// Body of `GET /tile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileState {
    /// Palette color name
    pub color: String,
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
    /// Time of the last write
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Login of the last writer
    #[serde(default)]
    pub last_editor: String,
}
