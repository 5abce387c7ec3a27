//! Bounded speed sample history

use std::collections::VecDeque;

use super::types::SpeedSample;

/// Append-only speed series with a retention limit
///
/// Once `limit` samples are held the oldest one is evicted per push;
/// `total()` keeps counting every sample ever appended.
#[derive(Debug, Clone)]
pub struct SpeedHistory {
    samples: VecDeque<SpeedSample>,
    limit: usize,
    total: u64,
}

impl SpeedHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            samples: VecDeque::with_capacity(limit.min(4096)),
            limit,
            total: 0,
        }
    }

    /// Append a sample
    pub fn push(&mut self, sample: SpeedSample) {
        if self.samples.len() == self.limit {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.total += 1;
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&SpeedSample> {
        self.samples.back()
    }

    /// Samples currently retained, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &SpeedSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples appended since creation, including evicted ones
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
