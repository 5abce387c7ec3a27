//! Drives a bar stream through a speedometer

use super::{BarUpdate, Speedometer};
use crate::alert::AlertSink;
use crate::feed::Bar;
use serde::Serialize;
use tokio::sync::mpsc;

/// Totals from one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub bars: u64,
    pub samples: u64,
    pub input_errors: u64,
    pub alerts: u64,
    pub delivery_failures: u64,
    pub last_speed: Option<f64>,
}

/// Process bars until the feed closes
///
/// Each bar is fully evaluated before the next is received. `on_update` is
/// called for every bar that did not fail with an input error.
pub async fn run<F>(
    speedometer: &mut Speedometer,
    mut bars: mpsc::Receiver<Bar>,
    sink: &dyn AlertSink,
    mut on_update: F,
) -> RunSummary
where
    F: FnMut(&Bar, &BarUpdate),
{
    let mut summary = RunSummary::default();

    while let Some(bar) = bars.recv().await {
        summary.bars += 1;

        let update = match speedometer.on_bar_with_sink(&bar, sink) {
            Ok(update) => update,
            Err(_) => {
                summary.input_errors += 1;
                continue;
            }
        };

        if let Some(sample) = &update.sample {
            summary.samples += 1;
            summary.last_speed = Some(sample.value);
        }
        if update.alert.is_some() {
            summary.alerts += 1;
        }
        if update.delivery_error.is_some() {
            summary.delivery_failures += 1;
        }

        on_update(&bar, &update);
    }

    tracing::info!(
        series = speedometer.series(),
        bars = summary.bars,
        samples = summary.samples,
        input_errors = summary.input_errors,
        alerts = summary.alerts,
        "Bar stream finished"
    );

    summary
}
