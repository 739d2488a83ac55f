//! Canvas palette
//!
//! The canvas knows exactly sixteen colors. [`ColorId`] can only hold an
//! index below [`PALETTE_SIZE`], so looking up its name cannot fail.

use serde::Serialize;
use std::fmt;

/// Number of colors on the canvas
pub const PALETTE_SIZE: usize = 16;

const NAMES: [&str; PALETTE_SIZE] = [
    "black",
    "forest",
    "green",
    "lime",
    "blue",
    "cornflowerblue",
    "sky",
    "cyan",
    "red",
    "burnt-orange",
    "orange",
    "yellow",
    "purple",
    "hot-pink",
    "pink",
    "white",
];

/// Palette index in `[0, 16)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColorId(u8);

impl ColorId {
    /// Id 0
    pub const BLACK: Self = Self(0);
    /// Id 15
    pub const WHITE: Self = Self(15);

    /// Bounded constructor; `None` outside the palette
    #[must_use]
    pub fn new(id: i64) -> Option<Self> {
        u8::try_from(id)
            .ok()
            .filter(|&id| usize::from(id) < PALETTE_SIZE)
            .map(Self)
    }

    /// Raw index
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Canvas color name
    #[must_use]
    pub fn name(self) -> &'static str {
        NAMES[usize::from(self.0)]
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only access to the palette table
pub struct Palette;

impl Palette {
    /// Name for an id
    #[must_use]
    pub fn name(id: ColorId) -> &'static str {
        id.name()
    }

    /// Reverse lookup, used when comparing against tiles read from the canvas
    #[must_use]
    pub fn id_of(name: &str) -> Option<ColorId> {
        NAMES
            .iter()
            .position(|&n| n == name)
            .and_then(|i| ColorId::new(i as i64))
    }

    /// All names in id order
    #[must_use]
    pub fn names() -> &'static [&'static str; PALETTE_SIZE] {
        &NAMES
    }
}
