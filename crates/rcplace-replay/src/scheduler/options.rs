//! Replay options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause after each dispatch unless configured otherwise
pub const DEFAULT_PACE: Duration = Duration::from_millis(1);

/// Options for a replay run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOptions {
    /// Decode and validate only; never call the canvas
    pub dry_run: bool,
    /// First accepted command to dispatch (1-based, inclusive)
    pub from_record: Option<u64>,
    /// Last accepted command to dispatch (1-based, inclusive)
    pub to_record: Option<u64>,
    /// Pause after every dispatch attempt
    pub pace: Duration,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            from_record: None,
            to_record: None,
            pace: DEFAULT_PACE,
        }
    }
}

impl ReplayOptions {
    /// Create options for a dry-run replay
    #[must_use]
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }

    /// Restrict dispatch to a range of accepted commands
    #[must_use]
    pub fn with_range(mut self, from: Option<u64>, to: Option<u64>) -> Self {
        self.from_record = from;
        self.to_record = to;
        self
    }

    /// Set the pacing interval
    #[must_use]
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Whether the `sequence`-th accepted command falls inside the range
    #[must_use]
    pub fn includes(&self, sequence: u64) -> bool {
        self.from_record.is_none_or(|from| sequence >= from)
            && self.to_record.is_none_or(|to| sequence <= to)
    }
}
