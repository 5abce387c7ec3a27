//! Bar feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped market observation
///
/// Bars arrive with strictly increasing `sequence_index` and
/// non-decreasing `timestamp`. Any other fields present in the source
/// (prices, volume) are ignored when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Position of the bar in its series
    pub sequence_index: u64,
    /// Bar close time
    pub timestamp: DateTime<Utc>,
}

impl Bar {
    /// Create a new bar
    pub fn new(sequence_index: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            sequence_index,
            timestamp,
        }
    }
}
