//! HTTP tile client

use crate::error::{Error, Result};
use crate::types::{CanvasConfig, TileRequest, TileState};
use rcplace_replay::{DispatchError, Tile, TileClient};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 200;

/// Client for the canvas `/tile` API
pub struct CanvasClient {
    client: Client,
    config: CanvasConfig,
}

impl CanvasClient {
    /// Create a new client
    pub fn new(config: CanvasConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Config("base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(CanvasConfig::from_env())
    }

    /// Base URL in use
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Paint one tile
    #[instrument(skip(self), fields(url = %self.config.tile_url()))]
    pub async fn put_tile(&self, x: u16, y: u16, color: &str) -> Result<()> {
        let body = TileRequest {
            x,
            y,
            color: color.to_string(),
        };
        let request = self.authorize(self.client.post(self.config.tile_url()).json(&body));
        let response = self.send(request).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Read one tile
    #[instrument(skip(self))]
    pub async fn get_tile(&self, x: u16, y: u16) -> Result<TileState> {
        let request = self.authorize(
            self.client
                .get(self.config.tile_url())
                .query(&[("x", x), ("y", y)]),
        );
        let response = check_status(self.send(request).await?).await?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(format!("{}: {}", e, body)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.config.timeout.as_millis() as u64)
            } else if e.is_connect() {
                Error::Network(format!(
                    "Failed to connect to canvas at {}",
                    self.config.base_url
                ))
            } else {
                Error::Network(e.to_string())
            }
        })
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%status, "canvas rejected request");
    Err(Error::Api {
        status: status.as_u16(),
        message: truncate(body.trim(), MAX_ERROR_BODY),
    })
}

#[async_trait::async_trait]
impl TileClient for CanvasClient {
    async fn set_tile(&self, tile: Tile) -> std::result::Result<(), DispatchError> {
        self.put_tile(tile.x, tile.y, tile.color)
            .await
            .map_err(DispatchError::from)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let cut = max_len.saturating_sub(3);
        let safe_end = s
            .char_indices()
            .take_while(|(i, _)| *i < cut)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..safe_end])
    }
}
