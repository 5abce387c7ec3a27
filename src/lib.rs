//! speedometer: bar-rate indicator with debounced threshold alerts
//!
//! This library provides the core components for:
//! - Measuring how many bars print per two-minute window over the last N bars
//! - Detecting upward crossings of a speed threshold
//! - Debouncing alerts with a cooldown counted in bars
//! - Delivering alerts to a log, channel or webhook without blocking
//! - Replaying bar files and exposing logs and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod feed;
pub mod indicator;
pub mod speed;
pub mod telemetry;
