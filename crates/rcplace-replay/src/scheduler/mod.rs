//! Replay scheduler
//!
//! Drives decode → validate → dispatch over a log in a single forward pass.
//! One record is in flight at a time, and every dispatch attempt (successful
//! or not) is followed by the pacing pause.

mod options;
mod report;

#[cfg(test)]
mod tests;

pub use options::{ReplayOptions, DEFAULT_PACE};
pub use report::{ReplayReport, SkippedRecord};

use crate::client::TileClient;
use crate::command::validate;
use crate::decoder::{Decoded, RecordDecoder};
use crate::error::{Error, Result};
use crate::frame::FrameReader;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Replays a write log against a [`TileClient`]
pub struct ReplayScheduler {
    client: Arc<dyn TileClient>,
    options: ReplayOptions,
}

impl ReplayScheduler {
    /// Create a scheduler
    pub fn new(client: Arc<dyn TileClient>, options: ReplayOptions) -> Self {
        Self { client, options }
    }

    /// Options in effect
    pub fn options(&self) -> &ReplayOptions {
        &self.options
    }

    /// Read the log at `path` in full, then replay it.
    pub async fn run_path(&self, path: &Path) -> Result<ReplayReport> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Source(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = bytes.len(), "log loaded");
        self.run(bytes.as_slice()).await
    }

    /// Replay every record of `source` in log order.
    ///
    /// Per-record problems are counted in the report; only a failure to
    /// read `source` is returned as an error.
    #[instrument(skip(self, source), fields(dry_run = self.options.dry_run))]
    pub async fn run<R: BufRead + Send>(&self, source: R) -> Result<ReplayReport> {
        let mut reader = FrameReader::new(source);
        let mut decoder = RecordDecoder::new();
        let mut report = ReplayReport::start(self.options.dry_run);
        let mut accepted: u64 = 0;

        info!(run_id = %report.run_id, "Starting replay");

        while let Some(decoded) = decoder.decode_next(&mut reader)? {
            let sequence = decoder.records_seen();

            let raw = match decoded {
                Decoded::Command(raw) => raw,
                Decoded::Skipped(reason) => {
                    warn!(sequence, %reason, "Skipping malformed record");
                    report.skip(sequence, reason);
                    continue;
                }
            };

            let command = match validate(raw) {
                Ok(command) => command,
                Err(err) => {
                    warn!(sequence, %err, "Rejecting record");
                    report.skip(sequence, err.into());
                    continue;
                }
            };

            accepted += 1;
            if !self.options.includes(accepted) {
                report.filtered += 1;
                continue;
            }

            let tile = command.to_tile();
            if self.options.dry_run {
                info!(x = tile.x, y = tile.y, color = tile.color, "Would place tile");
                report.applied += 1;
                continue;
            }

            match self.client.set_tile(tile.clone()).await {
                Ok(()) => {
                    info!(x = tile.x, y = tile.y, color = tile.color, "Tile placed");
                    report.applied += 1;
                    report.last_applied = Some(tile);
                }
                Err(err) => {
                    warn!(
                        x = tile.x,
                        y = tile.y,
                        status = ?err.status(),
                        error = %err,
                        "Tile not placed"
                    );
                    report.failed += 1;
                }
            }

            tokio::time::sleep(self.options.pace).await;
        }

        let report = report.finish(decoder.records_seen());
        info!(
            run_id = %report.run_id,
            records = report.records,
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            filtered = report.filtered,
            "Replay finished"
        );
        Ok(report)
    }
}
