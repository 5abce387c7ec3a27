//! Replay command implementation

use crate::alert::route_alerts;
use crate::config::Config;
use crate::feed::{BarFeed, JsonlBarFeed};
use crate::indicator::{run, BarUpdate, Speedometer};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Alerts buffered ahead of the webhook dispatcher
const ALERT_QUEUE_CAPACITY: usize = 64;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines file of bars (defaults to feed.input)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Series name (defaults to feed.series)
    #[arg(short, long)]
    pub series: Option<String>,

    /// Emit one JSON object per sample instead of text
    #[arg(long)]
    pub json: bool,
}

/// One replay output record
#[derive(Debug, Serialize)]
struct ReplayLine {
    sequence_index: u64,
    timestamp: DateTime<Utc>,
    speed: f64,
    regime: &'static str,
    alert: bool,
}

impl ReplayLine {
    fn from_update(update: &BarUpdate) -> Option<Self> {
        let sample = update.sample.as_ref()?;
        Some(Self {
            sequence_index: sample.sequence_index,
            timestamp: sample.timestamp,
            speed: sample.value,
            regime: update.regime.map(|r| r.as_str()).unwrap_or("slow"),
            alert: update.alert.is_some(),
        })
    }
}

impl ReplayArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let input = self
            .input
            .clone()
            .or_else(|| config.feed.input.clone())
            .context("No bar file given: pass --input or set feed.input")?;
        let series = self
            .series
            .clone()
            .unwrap_or_else(|| config.feed.series.clone());

        let mut speedometer = Speedometer::configure(config.speedometer.clone())?
            .with_series(series)
            .start();

        let feed = JsonlBarFeed::with_capacity(&input, config.feed.channel_capacity);
        let bars = feed.subscribe().await?;
        let route = route_alerts(&config.speedometer.alert_destination, ALERT_QUEUE_CAPACITY)?;

        tracing::info!(input = %input.display(), series = speedometer.series(), "Replaying bars");

        let json = self.json;
        let summary = run(&mut speedometer, bars, route.sink.as_ref(), |_, update| {
            let Some(line) = ReplayLine::from_update(update) else {
                return;
            };
            if json {
                match serde_json::to_string(&line) {
                    Ok(text) => println!("{}", text),
                    Err(e) => tracing::error!(error = %e, "Failed to encode sample"),
                }
            } else {
                println!(
                    "{}  #{:<8} speed {:>6}  {}{}",
                    line.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                    line.sequence_index,
                    line.speed,
                    line.regime,
                    if line.alert { "  ALERT" } else { "" }
                );
            }
        })
        .await;

        if let Some(stats) = route.shutdown().await {
            tracing::info!(
                delivered = stats.delivered,
                failed = stats.failed,
                "Alert dispatcher finished"
            );
        }

        if json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            println!();
            println!("Bars:          {}", summary.bars);
            println!("Samples:       {}", summary.samples);
            println!("Input errors:  {}", summary.input_errors);
            println!("Alerts:        {}", summary.alerts);
            if summary.delivery_failures > 0 {
                println!("Undelivered:   {}", summary.delivery_failures);
            }
            if let Some(speed) = summary.last_speed {
                println!("Last speed:    {}", speed);
            }
        }

        Ok(())
    }
}
