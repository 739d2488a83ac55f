//! rcplace Replay - Command-Log Replay Engine
//!
//! This crate repaints a canvas from a recorded write log:
//! - Frame: forward-only line reader over the log source
//! - Decoder: turns framed `BITFIELD SET` records into raw commands
//! - Command: range validation and grid/palette mapping
//! - Palette: the fixed sixteen-color table
//! - Scheduler: paced, in-order dispatch to a [`TileClient`]
//!
//! ## Usage
//!
//! ```ignore
//! use rcplace_replay::{ReplayOptions, ReplayScheduler};
//! use std::sync::Arc;
//!
//! let scheduler = ReplayScheduler::new(Arc::new(client), ReplayOptions::default());
//! let report = scheduler.run_path("appendonly.aof".as_ref()).await?;
//! println!("applied {} skipped {}", report.applied, report.skipped);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod command;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod mock;
pub mod palette;
pub mod scheduler;

pub use client::TileClient;
pub use command::{validate, Command, RawCommand, Tile, CELL_COUNT, GRID_SIZE};
pub use decoder::{Decoded, RecordDecoder, BEGIN_MARKER};
pub use error::{DispatchError, Error, Field, RangeError, Result, SkipReason};
pub use frame::FrameReader;
pub use mock::RecordingTileClient;
pub use palette::{ColorId, Palette, PALETTE_SIZE};
pub use scheduler::{ReplayOptions, ReplayReport, ReplayScheduler, SkippedRecord, DEFAULT_PACE};
