//! Command types and range validation
//!
//! A [`RawCommand`] is whatever the decoder pulled out of the log. Only
//! [`validate`] turns it into a [`Command`], and only a `Command` can
//! become a [`Tile`].

use crate::error::{Field, RangeError};
use crate::palette::ColorId;
use serde::Serialize;

/// Width and height of the canvas grid
pub const GRID_SIZE: u16 = 100;

/// Number of addressable cells (`GRID_SIZE * GRID_SIZE`)
pub const CELL_COUNT: u16 = GRID_SIZE * GRID_SIZE;

/// Decoded but unchecked record payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawCommand {
    /// Linear offset, intended `[0, 10000)`
    pub position: i64,
    /// Palette index, intended `[0, 16)`
    pub color: i64,
}

impl RawCommand {
    /// Create a raw command
    #[must_use]
    pub fn new(position: i64, color: i64) -> Self {
        Self { position, color }
    }
}

/// A range-checked write command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Command {
    position: u16,
    color: ColorId,
}

impl Command {
    /// Linear offset in `[0, CELL_COUNT)`
    #[must_use]
    pub fn position(&self) -> u16 {
        self.position
    }

    /// Palette index
    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    /// Grid coordinate `(x, y)` of this command
    #[must_use]
    pub fn coordinates(&self) -> (u16, u16) {
        (self.position % GRID_SIZE, self.position / GRID_SIZE)
    }

    /// The tile this command paints
    #[must_use]
    pub fn to_tile(&self) -> Tile {
        let (x, y) = self.coordinates();
        Tile {
            x,
            y,
            color: self.color.name(),
        }
    }
}

/// Unit of work sent to the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Column in `[0, 100)`
    pub x: u16,
    /// Row in `[0, 100)`
    pub y: u16,
    /// Palette color name
    pub color: &'static str,
}

/// Check a raw command against the grid and palette domains.
///
/// Position is checked first, so a record with both fields out of range
/// reports the position.
pub fn validate(raw: RawCommand) -> Result<Command, RangeError> {
    let position = u16::try_from(raw.position)
        .ok()
        .filter(|&p| p < CELL_COUNT)
        .ok_or(RangeError {
            field: Field::Position,
            value: raw.position,
            limit: i64::from(CELL_COUNT),
        })?;

    let color = ColorId::new(raw.color).ok_or(RangeError {
        field: Field::Color,
        value: raw.color,
        limit: crate::palette::PALETTE_SIZE as i64,
    })?;

    Ok(Command { position, color })
}
