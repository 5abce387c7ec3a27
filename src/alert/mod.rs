//! Alert module
//!
//! Detects upward speed-threshold crossings, debounces them by bar count,
//! and hands the resulting alerts to a delivery sink

mod debouncer;
mod sink;
mod types;
mod webhook;

pub use debouncer::{is_crossing, AlertDebouncer};
pub use sink::{is_webhook, route_alerts, AlertRoute, AlertSink, ChannelSink, LogSink};
pub use types::{AlertEvent, AlertState, DeliveryError};
pub use webhook::{DispatchStats, WebhookNotifier, WebhookPayload};
