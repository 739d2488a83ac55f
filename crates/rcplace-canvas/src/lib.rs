//! rcplace Canvas - Tile API Client
//!
//! HTTP implementation of [`rcplace_replay::TileClient`] for the canvas
//! service:
//! - `POST /tile` with `{"x", "y", "color"}` paints a tile
//! - `GET /tile?x=&y=` reads one back
//!
//! Requests carry `Authorization: Bearer <personal access token>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod types;


pub use client::CanvasClient;
pub use error::{Error, Result};
pub use types::{CanvasConfig, TileRequest, TileState, DEFAULT_BASE_URL, TOKEN_ENV};
