//! Bar-rate calculation
//!
//! Measures how long the last `period` bars took to form and scales that
//! rate to a fixed two-minute reference window. A fast market prints many
//! bars per window, a quiet one few.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::VecDeque;

use super::types::{InputError, SpeedSample};
use crate::feed::Bar;

/// Reference window the speed is expressed in, in minutes
pub const REFERENCE_WINDOW_MINUTES: f64 = 2.0;

/// Speed for `period` bars spanning `elapsed`
///
/// `round(period / (elapsed_secs / 60) * 2)`, ties rounded away from zero.
pub fn speed_from_span(period: usize, elapsed: TimeDelta) -> Result<f64, InputError> {
    let elapsed_secs = elapsed
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .ok_or(InputError::NonFiniteElapsed { period })?;

    if !elapsed_secs.is_finite() {
        return Err(InputError::NonFiniteElapsed { period });
    }
    if elapsed_secs <= 0.0 {
        return Err(InputError::NonPositiveElapsed {
            period,
            elapsed_secs,
        });
    }

    let bars_per_window = period as f64 / (elapsed_secs / 60.0) * REFERENCE_WINDOW_MINUTES;
    if !bars_per_window.is_finite() {
        return Err(InputError::NonFiniteElapsed { period });
    }

    Ok(bars_per_window.round())
}

/// Rolling bar-rate calculator
///
/// Keeps the timestamps of the last `period + 1` bars. Output is a pure
/// function of that window.
#[derive(Debug, Clone)]
pub struct RateCalculator {
    period: usize,
    window: VecDeque<DateTime<Utc>>,
    bars_seen: u64,
    last_index: Option<u64>,
}

impl RateCalculator {
    /// Create a calculator spanning `period` bars
    ///
    /// `period` must be at least 1; the speedometer validates this before
    /// constructing a calculator.
    pub fn new(period: usize) -> Self {
        debug_assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            bars_seen: 0,
            last_index: None,
        }
    }

    /// Feed one bar
    ///
    /// Returns `Ok(None)` during warm-up. A bar that does not advance the
    /// sequence is rejected before it enters the window; a bar whose
    /// window spans no time stays in the window but yields an error.
    pub fn on_bar(&mut self, bar: &Bar) -> Result<Option<SpeedSample>, InputError> {
        if let Some(previous) = self.last_index {
            if bar.sequence_index <= previous {
                return Err(InputError::SequenceRegression {
                    previous,
                    index: bar.sequence_index,
                });
            }
        }
        self.last_index = Some(bar.sequence_index);
        self.bars_seen += 1;

        if self.window.len() == self.period + 1 {
            self.window.pop_front();
        }
        self.window.push_back(bar.timestamp);

        if !self.is_warm() {
            return Ok(None);
        }

        let Some(&start) = self.window.front() else {
            return Ok(None);
        };
        let value = speed_from_span(self.period, bar.timestamp - start)?;

        Ok(Some(SpeedSample::new(
            bar.sequence_index,
            bar.timestamp,
            value,
        )))
    }

    /// Number of bars spanned by the measurement
    pub fn period(&self) -> usize {
        self.period
    }

    /// Bars accepted so far
    pub fn bars_seen(&self) -> u64 {
        self.bars_seen
    }

    /// Whether enough bars have been seen to produce samples
    pub fn is_warm(&self) -> bool {
        self.window.len() > self.period
    }

    /// Forget all bars
    pub fn reset(&mut self) {
        self.window.clear();
        self.bars_seen = 0;
        self.last_index = None;
    }
}
