//! Speed calculation module
//!
//! Turns a bar stream into a "bars per two minutes" speed series

mod calculator;
mod history;
mod types;

pub use calculator::{speed_from_span, RateCalculator, REFERENCE_WINDOW_MINUTES};
pub use history::SpeedHistory;
pub use types::{InputError, SpeedRegime, SpeedSample};
