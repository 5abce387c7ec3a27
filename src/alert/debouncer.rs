//! Threshold crossing detection with a bar-count cooldown
//!
//! A crossing is `previous < threshold && current >= threshold`. The
//! comparison is strict on the previous sample and inclusive on the current
//! one, so a series sitting exactly on the threshold does not re-trigger.
//! The cooldown counts samples since the last emitted alert, not since the
//! last crossing.

use super::types::{AlertEvent, AlertState};
use crate::config::SpeedometerConfig;
use crate::speed::SpeedSample;

/// Upward crossing test
pub fn is_crossing(previous: f64, current: f64, threshold: f64) -> bool {
    previous < threshold && current >= threshold
}

/// Emits at most one alert per crossing, no more often than the cooldown
#[derive(Debug, Clone)]
pub struct AlertDebouncer {
    threshold: f64,
    cooldown_bars: u64,
    destination: String,
    state: AlertState,
}

impl AlertDebouncer {
    /// Create a debouncer
    ///
    /// The counter starts at zero: no alert can fire until more than
    /// `cooldown_bars` samples have been seen.
    pub fn new(
        threshold: f64,
        cooldown_bars: u64,
        enabled: bool,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            threshold,
            cooldown_bars,
            destination: destination.into(),
            state: AlertState {
                bars_since_last_alert: 0,
                enabled,
            },
        }
    }

    pub fn from_config(config: &SpeedometerConfig) -> Self {
        Self::new(
            config.min_threshold,
            config.alert_cooldown_bars,
            config.alerts_enabled,
            config.alert_destination.clone(),
        )
    }

    /// Inspect one new sample against its predecessor
    ///
    /// A non-finite current speed is rejected without touching the state.
    /// A missing or non-finite previous speed counts the sample but cannot
    /// form a crossing.
    pub fn on_sample(
        &mut self,
        previous: Option<f64>,
        current: &SpeedSample,
    ) -> Option<AlertEvent> {
        if !current.value.is_finite() {
            tracing::warn!(
                sequence_index = current.sequence_index,
                speed = current.value,
                "Rejecting non-finite speed sample"
            );
            return None;
        }

        self.state.bars_since_last_alert = self.state.bars_since_last_alert.saturating_add(1);

        let previous = previous.filter(|p| p.is_finite())?;
        if !is_crossing(previous, current.value, self.threshold) {
            return None;
        }

        if !self.state.enabled {
            tracing::debug!(
                sequence_index = current.sequence_index,
                speed = current.value,
                "Crossing ignored, alerts disabled"
            );
            return None;
        }

        if self.state.bars_since_last_alert <= self.cooldown_bars {
            tracing::debug!(
                sequence_index = current.sequence_index,
                bars_since_last_alert = self.state.bars_since_last_alert,
                cooldown_bars = self.cooldown_bars,
                "Crossing suppressed by cooldown"
            );
            return None;
        }

        self.state.bars_since_last_alert = 0;
        Some(AlertEvent::new(
            self.threshold,
            current.value,
            current.sequence_index,
            current.timestamp,
            self.destination.clone(),
        ))
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
