//! Alert types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Alert delivery errors
///
/// Delivery is terminal and never retried. These are logged and counted by
/// the caller; they never halt bar processing or roll back the cooldown.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// In-process alert queue is at capacity
    #[error("Alert channel full")]
    ChannelFull,
    /// Nothing is consuming the alert queue any more
    #[error("Alert channel closed")]
    ChannelClosed,
    /// Destination answered with a non-success status
    #[error("Destination rejected alert: HTTP {status}")]
    Rejected { status: u16 },
    /// Destination could not be reached
    #[error("Alert transport failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An upward threshold crossing that passed the cooldown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Unique alert identifier
    pub id: Uuid,
    /// Threshold that was crossed
    pub threshold: f64,
    /// Speed of the sample that crossed it
    pub current_speed: f64,
    /// Bar that produced the crossing sample
    pub sequence_index: u64,
    /// Timestamp of that bar
    pub timestamp: DateTime<Utc>,
    /// Where the alert should be delivered
    pub destination: String,
}

impl AlertEvent {
    /// Create a new alert event
    pub fn new(
        threshold: f64,
        current_speed: f64,
        sequence_index: u64,
        timestamp: DateTime<Utc>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            threshold,
            current_speed,
            sequence_index,
            timestamp,
            destination: destination.into(),
        }
    }

    /// Short alert title
    pub fn subject(&self) -> String {
        format!("ALERT: SPEED IS ABOVE {}", self.threshold)
    }

    /// Alert message text
    pub fn body(&self) -> String {
        format!("The speed has crossed above {}.", self.threshold)
    }
}

/// Debounce state owned by one [`super::AlertDebouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertState {
    /// Samples seen since the last emitted alert
    pub bars_since_last_alert: u64,
    /// Whether alerts are emitted at all
    pub enabled: bool,
}
