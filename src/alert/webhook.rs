//! HTTP webhook alert notifier

use super::types::{AlertEvent, DeliveryError};
use crate::telemetry::{self, CounterMetric};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// JSON body posted for each alert
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub id: Uuid,
    pub subject: String,
    pub body: String,
    pub threshold: f64,
    pub speed: f64,
    pub sequence_index: u64,
    pub timestamp: DateTime<Utc>,
    pub destination: &'a str,
}

impl<'a> From<&'a AlertEvent> for WebhookPayload<'a> {
    fn from(event: &'a AlertEvent) -> Self {
        Self {
            id: event.id,
            subject: event.subject(),
            body: event.body(),
            threshold: event.threshold,
            speed: event.current_speed,
            sequence_index: event.sequence_index,
            timestamp: event.timestamp,
            destination: &event.destination,
        }
    }
}

/// Counts from a finished dispatcher task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Posts alerts to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier with a 10 second request timeout
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(url, Duration::from_secs(10))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one alert
    pub async fn send(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::from(event))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Drain `rx` on a background task until every sender is dropped
    ///
    /// Failures are logged and counted, never retried.
    pub fn spawn(self, mut rx: mpsc::Receiver<AlertEvent>) -> JoinHandle<DispatchStats> {
        tokio::spawn(async move {
            let mut stats = DispatchStats::default();
            while let Some(event) = rx.recv().await {
                match self.send(&event).await {
                    Ok(()) => {
                        stats.delivered += 1;
                        tracing::info!(alert_id = %event.id, url = %self.url, "Alert delivered");
                    }
                    Err(e) => {
                        stats.failed += 1;
                        telemetry::increment(CounterMetric::DeliveryFailures);
                        tracing::warn!(
                            alert_id = %event.id,
                            url = %self.url,
                            error = %e,
                            "Alert delivery failed"
                        );
                    }
                }
            }
            stats
        })
    }
}
