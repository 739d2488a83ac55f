//! Seam between the replay engine and the canvas service

use crate::command::Tile;
use crate::error::DispatchError;

/// Paints single tiles on a canvas.
///
/// The scheduler issues one call at a time and waits for it to finish, so
/// implementations only need to support sequential use.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TileClient: Send + Sync {
    /// Paint `tile`. A failure only affects this tile.
    async fn set_tile(&self, tile: Tile) -> std::result::Result<(), DispatchError>;
}
