//! Recording tile client for testing
//!
//! Keeps every tile it is asked to paint, together with the (tokio) instant
//! of the call, and can be primed with failures.

use crate::client::TileClient;
use crate::command::Tile;
use crate::error::DispatchError;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// A tile client that records calls instead of talking to a canvas.
#[derive(Clone, Default)]
pub struct RecordingTileClient {
    calls: Arc<Mutex<Vec<(Tile, Instant)>>>,
    failures: Arc<Mutex<VecDeque<Option<DispatchError>>>>,
}

impl RecordingTileClient {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next call: `Some(err)` fails it, `None` lets it succeed.
    pub fn push_outcome(&self, outcome: Option<DispatchError>) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// Tiles received so far, in call order.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(tile, _)| tile.clone())
            .collect()
    }

    /// Instants at which each call arrived.
    #[must_use]
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait::async_trait]
impl TileClient for RecordingTileClient {
    async fn set_tile(&self, tile: Tile) -> Result<(), DispatchError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((tile, Instant::now()));

        let outcome = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .flatten();

        match outcome {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Encode one write record the way the canvas server's log stores it.
///
/// Tokens are taken verbatim so tests can write malformed values.
#[must_use]
pub fn aof_record(position: &str, color: &str) -> String {
    format!(
        "*6\r\n$8\r\nBITFIELD\r\n$5\r\nboard\r\n$3\r\nSET\r\n$2\r\nu4\r\n${}\r\n{}\r\n${}\r\n{}\r\n",
        position.len(),
        position,
        color.len(),
        color
    )
}
