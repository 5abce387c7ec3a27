//! Speedometer indicator module
//!
//! Per-bar pipeline, instance registry and stream runner

mod registry;
mod runner;
mod speedometer;

pub use registry::SpeedometerRegistry;
pub use runner::{run, RunSummary};
pub use speedometer::{BarUpdate, ConfiguredSpeedometer, Speedometer};
