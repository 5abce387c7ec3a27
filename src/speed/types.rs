//! Speed sample types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed timing input
///
/// The offending bar produces no sample and the alert state is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Duplicate or out-of-order timestamps across the period
    #[error("Non-positive elapsed time over {period} bars: {elapsed_secs}s")]
    NonPositiveElapsed { period: usize, elapsed_secs: f64 },
    /// Elapsed time could not be represented
    #[error("Non-finite elapsed time over {period} bars")]
    NonFiniteElapsed { period: usize },
    /// Bar did not advance the sequence
    #[error("Bar sequence regressed: {index} after {previous}")]
    SequenceRegression { previous: u64, index: u64 },
}

/// One speed value, produced per bar once the window is warm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    /// Sequence index of the bar that produced the sample
    pub sequence_index: u64,
    /// Timestamp of that bar
    pub timestamp: DateTime<Utc>,
    /// Bars per two-minute window, rounded to an integer
    pub value: f64,
}

impl SpeedSample {
    /// Create a new speed sample
    pub fn new(sequence_index: u64, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            sequence_index,
            timestamp,
            value,
        }
    }
}

/// Fast/slow classification of a speed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedRegime {
    /// Below the threshold
    Slow,
    /// At or above the threshold
    Fast,
}

impl SpeedRegime {
    /// Classify a speed against a threshold
    pub fn classify(speed: f64, threshold: f64) -> Self {
        if speed >= threshold {
            SpeedRegime::Fast
        } else {
            SpeedRegime::Slow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedRegime::Slow => "slow",
            SpeedRegime::Fast => "fast",
        }
    }
}

impl std::fmt::Display for SpeedRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
