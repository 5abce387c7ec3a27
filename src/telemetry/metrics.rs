//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Bars handed to a speedometer
    BarsProcessed,
    /// Speed samples produced
    SamplesEmitted,
    /// Bars rejected for malformed timing
    InputErrors,
    /// Alerts emitted by the debouncer
    AlertsFired,
    /// Alerts the sink failed to accept or deliver
    DeliveryFailures,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Latest speed value
    Speed,
    /// Samples since the last alert
    BarsSinceAlert,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::BarsProcessed => "speedometer_bars_total",
            CounterMetric::SamplesEmitted => "speedometer_samples_total",
            CounterMetric::InputErrors => "speedometer_input_errors_total",
            CounterMetric::AlertsFired => "speedometer_alerts_total",
            CounterMetric::DeliveryFailures => "speedometer_delivery_failures_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Speed => "speedometer_speed",
            GaugeMetric::BarsSinceAlert => "speedometer_bars_since_alert",
        }
    }
}

/// Increment an unlabeled counter
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Increment a counter labeled with its bar series
pub fn increment_series(metric: CounterMetric, series: &str) {
    metrics::counter!(metric.name(), "series" => series.to_string()).increment(1);
}

/// Set a gauge labeled with its bar series
pub fn set_gauge(metric: GaugeMetric, series: &str, value: f64) {
    metrics::gauge!(metric.name(), "series" => series.to_string()).set(value);
}

/// Install the Prometheus exporter listening on `port`
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
