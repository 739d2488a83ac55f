//! Replay summary

use crate::command::Tile;
use crate::error::SkipReason;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A record that was dropped, with its position in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 1-based index of the record's begin marker
    pub sequence: u64,
    /// Why it was dropped
    pub reason: SkipReason,
}

/// Outcome of a replay run
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Identifier for this run (appears in logs)
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When input was exhausted
    pub finished_at: Option<DateTime<Utc>>,
    /// Whether the canvas was actually called
    pub dry_run: bool,
    /// Begin markers seen in the log
    pub records: u64,
    /// Tiles painted (or that would have been, in a dry run)
    pub applied: u64,
    /// Records dropped by decoding or validation
    pub skipped: u64,
    /// Dispatches the canvas did not accept
    pub failed: u64,
    /// Valid commands outside the requested range
    pub filtered: u64,
    /// Details of every skipped record
    pub skipped_records: Vec<SkippedRecord>,
    /// Last tile the canvas accepted
    pub last_applied: Option<Tile>,
}

impl ReplayReport {
    pub(crate) fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            records: 0,
            applied: 0,
            skipped: 0,
            failed: 0,
            filtered: 0,
            skipped_records: Vec::new(),
            last_applied: None,
        }
    }

    pub(crate) fn skip(&mut self, sequence: u64, reason: SkipReason) {
        self.skipped += 1;
        self.skipped_records.push(SkippedRecord { sequence, reason });
    }

    pub(crate) fn finish(mut self, records: u64) -> Self {
        self.records = records;
        self.finished_at = Some(Utc::now());
        self
    }

    /// Skipped records that failed range validation
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.skipped_records
            .iter()
            .filter(|r| r.reason.is_rejection())
            .count() as u64
    }

    /// True when nothing went wrong with any record
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}
