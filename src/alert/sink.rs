//! Alert delivery boundary
//!
//! Sinks are synchronous and must not block: the indicator hands an alert
//! over and moves on to the next bar. Anything slow (network) lives behind a
//! channel on its own task.

use super::types::{AlertEvent, DeliveryError};
use super::webhook::{DispatchStats, WebhookNotifier};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// Fire-and-forget alert delivery
pub trait AlertSink: Send + Sync {
    /// Hand an alert to the destination without waiting for confirmation
    fn deliver(&self, event: &AlertEvent) -> Result<(), DeliveryError>;
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn deliver(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        (**self).deliver(event)
    }
}

/// Writes alerts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        tracing::warn!(
            alert_id = %event.id,
            destination = %event.destination,
            speed = event.current_speed,
            threshold = event.threshold,
            sequence_index = event.sequence_index,
            "{}",
            event.subject()
        );
        Ok(())
    }
}

/// Queues alerts on a bounded channel for an async consumer
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<AlertEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its alerts arrive on
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AlertEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelSink {
    fn deliver(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        self.tx.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::ChannelFull,
            TrySendError::Closed(_) => DeliveryError::ChannelClosed,
        })
    }
}

/// A sink wired to its destination, plus the task draining it if any
pub struct AlertRoute {
    pub sink: Box<dyn AlertSink>,
    dispatcher: Option<JoinHandle<DispatchStats>>,
}

impl AlertRoute {
    /// Close the sink and wait for queued alerts to be dispatched
    pub async fn shutdown(self) -> Option<DispatchStats> {
        drop(self.sink);
        match self.dispatcher {
            Some(handle) => match handle.await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::error!(error = %e, "Alert dispatcher task failed");
                    None
                }
            },
            None => None,
        }
    }
}

/// Whether a destination names an HTTP webhook
pub fn is_webhook(destination: &str) -> bool {
    destination.starts_with("http://") || destination.starts_with("https://")
}

/// Build the sink for a configured destination
///
/// HTTP(S) URLs get a [`WebhookNotifier`] behind a [`ChannelSink`]; anything
/// else is logged. Must be called inside a tokio runtime.
pub fn route_alerts(destination: &str, capacity: usize) -> anyhow::Result<AlertRoute> {
    if is_webhook(destination) {
        let notifier = WebhookNotifier::new(destination)?;
        let (sink, rx) = ChannelSink::new(capacity);
        let dispatcher = notifier.spawn(rx);
        tracing::info!(destination, "Alerts routed to webhook");
        return Ok(AlertRoute {
            sink: Box::new(sink),
            dispatcher: Some(dispatcher),
        });
    }

    tracing::info!(destination, "Alerts routed to log");
    Ok(AlertRoute {
        sink: Box::new(LogSink),
        dispatcher: None,
    })
}
