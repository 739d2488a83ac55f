//! CLI module for rcplace
//!
//! One positional argument (the log to replay) plus flags that override
//! the loaded configuration.

use anyhow::Context;
use clap::Parser;
use rcplace_canvas::CanvasClient;
use rcplace_replay::{Palette, ReplayReport, ReplayScheduler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::settings::{load_config, AppConfig};

/// Replay a recorded canvas write log
#[derive(Parser, Debug)]
#[command(name = "rcplace")]
#[command(about = "Repaint an rc-place canvas from its append-only write log")]
#[command(version)]
pub struct Cli {
    /// Path to the append-only write log
    pub log: PathBuf,

    /// Decode and validate only; do not touch the canvas
    #[arg(long)]
    pub dry_run: bool,

    /// First valid command to replay (1-based)
    #[arg(long, value_name = "N")]
    pub from: Option<u64>,

    /// Last valid command to replay (1-based, inclusive)
    #[arg(long, value_name = "N")]
    pub to: Option<u64>,

    /// Pause between tile writes, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pace_ms: Option<u64>,

    /// Canvas base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Read back the last written tile and compare its color
    #[arg(long)]
    pub verify_last: bool,
}

/// Run the replay described by `cli`
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config()?;
    apply_overrides(&mut config, &cli);

    let mut options = config.replay.options().with_range(cli.from, cli.to);
    options.dry_run = cli.dry_run;

    let canvas = Arc::new(
        CanvasClient::new(config.canvas.into_client_config())
            .context("Failed to create canvas client")?,
    );
    info!(canvas = canvas.base_url(), "Replaying {}", cli.log.display());

    let scheduler = ReplayScheduler::new(canvas.clone(), options);
    let report = scheduler
        .run_path(&cli.log)
        .await
        .with_context(|| format!("Failed to replay {}", cli.log.display()))?;

    if cli.verify_last {
        verify_last(&canvas, &report).await;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(url) = &cli.base_url {
        config.canvas.base_url = url.clone();
    }
    if let Some(pace) = cli.pace_ms {
        config.replay.pace_ms = pace;
    }
}

async fn verify_last(canvas: &CanvasClient, report: &ReplayReport) {
    let Some(tile) = &report.last_applied else {
        info!("Nothing was written; skipping verification");
        return;
    };

    match canvas.get_tile(tile.x, tile.y).await {
        Ok(state) if state.color == tile.color => {
            info!(x = tile.x, y = tile.y, color = tile.color, "Last tile verified");
        }
        Ok(state) => {
            warn!(
                x = tile.x,
                y = tile.y,
                expected = tile.color,
                found = %state.color,
                known = Palette::id_of(&state.color).is_some(),
                "Last tile differs from replayed color"
            );
        }
        Err(e) => warn!(error = %e, "Could not read back last tile"),
    }
}

fn print_summary(report: &ReplayReport) {
    let elapsed = report
        .finished_at
        .map(|end| (end - report.started_at).to_std().unwrap_or(Duration::ZERO))
        .unwrap_or_default();

    println!(
        "{}Replayed {} records in {:.1}s: {} applied, {} skipped ({} out of range), {} failed, {} filtered",
        if report.dry_run { "[dry run] " } else { "" },
        report.records,
        elapsed.as_secs_f64(),
        report.applied,
        report.skipped,
        report.rejected(),
        report.failed,
        report.filtered,
    );
    for skipped in &report.skipped_records {
        println!("  record {}: {}", skipped.sequence, skipped.reason);
    }
}
