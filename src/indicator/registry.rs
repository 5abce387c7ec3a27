//! Speedometer instances keyed by series and configuration

use super::Speedometer;
use crate::config::{ConfigError, SpeedometerConfig};

/// Holds independent speedometers, one per distinct `(series, config)`
///
/// Lookup is by value equality on both parts of the key. The number of
/// instances per process is small, so a linear scan is used.
#[derive(Debug, Default)]
pub struct SpeedometerRegistry {
    instances: Vec<Speedometer>,
}

impl SpeedometerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the instance for this key, configuring and starting one if
    /// none exists yet
    pub fn get_or_start(
        &mut self,
        series: &str,
        config: &SpeedometerConfig,
    ) -> Result<&mut Speedometer, ConfigError> {
        if let Some(pos) = self.position(series, config) {
            return Ok(&mut self.instances[pos]);
        }

        let speedometer = Speedometer::configure(config.clone())?
            .with_series(series)
            .start();
        self.instances.push(speedometer);
        tracing::debug!(series, instances = self.instances.len(), "Registered speedometer");

        let last = self.instances.len() - 1;
        Ok(&mut self.instances[last])
    }

    /// Look up an existing instance
    pub fn get(&self, series: &str, config: &SpeedometerConfig) -> Option<&Speedometer> {
        self.position(series, config).map(|pos| &self.instances[pos])
    }

    /// Remove and return an instance
    pub fn remove(&mut self, series: &str, config: &SpeedometerConfig) -> Option<Speedometer> {
        self.position(series, config)
            .map(|pos| self.instances.swap_remove(pos))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn position(&self, series: &str, config: &SpeedometerConfig) -> Option<usize> {
        self.instances
            .iter()
            .position(|s| s.series() == series && s.config() == config)
    }
}
