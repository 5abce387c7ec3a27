//! Speedometer indicator
//!
//! Wires a [`RateCalculator`], a [`SpeedHistory`] and an [`AlertDebouncer`]
//! into the per-bar pipeline. Setup is two explicit steps:
//! [`Speedometer::configure`] validates, [`ConfiguredSpeedometer::start`]
//! allocates the window and history.

use crate::alert::{AlertDebouncer, AlertEvent, AlertSink, AlertState, DeliveryError};
use crate::config::{ConfigError, SpeedometerConfig};
use crate::feed::Bar;
use crate::speed::{InputError, RateCalculator, SpeedHistory, SpeedRegime, SpeedSample};
use crate::telemetry::{self, CounterMetric, GaugeMetric};

/// Result of feeding one bar
#[derive(Debug, Default)]
pub struct BarUpdate {
    /// New speed sample, `None` during warm-up
    pub sample: Option<SpeedSample>,
    /// Fast/slow classification of the sample
    pub regime: Option<SpeedRegime>,
    /// Alert emitted for this bar
    pub alert: Option<AlertEvent>,
    /// Set when the alert could not be handed to the sink
    pub delivery_error: Option<DeliveryError>,
}

/// A validated configuration waiting to be started
#[derive(Debug, Clone)]
pub struct ConfiguredSpeedometer {
    config: SpeedometerConfig,
    series: String,
}

impl ConfiguredSpeedometer {
    /// Name the bar series this instance tracks (logs and metrics)
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    /// Allocate state and begin accepting bars
    pub fn start(self) -> Speedometer {
        tracing::debug!(
            series = %self.series,
            period = self.config.period,
            min_threshold = self.config.min_threshold,
            alert_cooldown_bars = self.config.alert_cooldown_bars,
            alerts_enabled = self.config.alerts_enabled,
            "Speedometer started"
        );
        Speedometer {
            calculator: RateCalculator::new(self.config.period),
            history: SpeedHistory::new(self.config.history_limit),
            debouncer: AlertDebouncer::from_config(&self.config),
            config: self.config,
            series: self.series,
        }
    }
}

/// Bar-rate indicator with debounced threshold alerts
#[derive(Debug, Clone)]
pub struct Speedometer {
    config: SpeedometerConfig,
    series: String,
    calculator: RateCalculator,
    history: SpeedHistory,
    debouncer: AlertDebouncer,
}

impl Speedometer {
    /// Validate a configuration
    pub fn configure(config: SpeedometerConfig) -> Result<ConfiguredSpeedometer, ConfigError> {
        config.validate()?;
        Ok(ConfiguredSpeedometer {
            config,
            series: "default".to_string(),
        })
    }

    /// Evaluate one bar: rate first, then crossing detection
    pub fn on_bar(&mut self, bar: &Bar) -> Result<BarUpdate, InputError> {
        telemetry::increment_series(CounterMetric::BarsProcessed, &self.series);

        let sample = match self.calculator.on_bar(bar) {
            Ok(Some(sample)) => sample,
            Ok(None) => return Ok(BarUpdate::default()),
            Err(e) => {
                telemetry::increment_series(CounterMetric::InputErrors, &self.series);
                tracing::warn!(
                    series = %self.series,
                    sequence_index = bar.sequence_index,
                    error = %e,
                    "Bar rejected"
                );
                return Err(e);
            }
        };

        let previous = self.history.latest().map(|s| s.value);
        self.history.push(sample);

        let regime = SpeedRegime::classify(sample.value, self.config.min_threshold);
        telemetry::increment_series(CounterMetric::SamplesEmitted, &self.series);
        telemetry::set_gauge(GaugeMetric::Speed, &self.series, sample.value);
        tracing::debug!(
            series = %self.series,
            sequence_index = sample.sequence_index,
            time = %sample.timestamp,
            speed = sample.value,
            %regime,
            "Speed sample"
        );

        let alert = self.debouncer.on_sample(previous, &sample);
        telemetry::set_gauge(
            GaugeMetric::BarsSinceAlert,
            &self.series,
            self.debouncer.state().bars_since_last_alert as f64,
        );
        if let Some(event) = &alert {
            telemetry::increment_series(CounterMetric::AlertsFired, &self.series);
            tracing::info!(
                series = %self.series,
                alert_id = %event.id,
                speed = event.current_speed,
                threshold = event.threshold,
                "Speed crossed above threshold"
            );
        }

        Ok(BarUpdate {
            sample: Some(sample),
            regime: Some(regime),
            alert,
            delivery_error: None,
        })
    }

    /// Evaluate one bar and hand any alert to `sink`
    ///
    /// The cooldown has already been reset when delivery is attempted, so a
    /// failed delivery does not make the next crossing alert sooner.
    pub fn on_bar_with_sink(
        &mut self,
        bar: &Bar,
        sink: &dyn AlertSink,
    ) -> Result<BarUpdate, InputError> {
        let mut update = self.on_bar(bar)?;

        if let Some(event) = &update.alert {
            if let Err(e) = sink.deliver(event) {
                telemetry::increment_series(CounterMetric::DeliveryFailures, &self.series);
                tracing::warn!(
                    series = %self.series,
                    alert_id = %event.id,
                    error = %e,
                    "Alert delivery failed"
                );
                update.delivery_error = Some(e);
            }
        }

        Ok(update)
    }

    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn history(&self) -> &SpeedHistory {
        &self.history
    }

    /// Most recent speed sample
    pub fn latest(&self) -> Option<&SpeedSample> {
        self.history.latest()
    }

    pub fn alert_state(&self) -> &AlertState {
        self.debouncer.state()
    }

    /// Bars accepted by the rate calculator
    pub fn bars_seen(&self) -> u64 {
        self.calculator.bars_seen()
    }
}
