//! Per-station running statistics in fixed-point tenths

use serde::{Deserialize, Serialize};

/// Running min/max/sum/count for one station
///
/// All values are tenths of a degree. `min <= max` holds once at least
/// one measurement has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    pub min: i16,
    pub max: i16,
    pub sum: i64,
    pub count: u64,
}

impl Accumulator {
    /// Seed from the first observed measurement
    pub fn new(value: i16) -> Self {
        Self {
            min: value,
            max: value,
            sum: value as i64,
            count: 1,
        }
    }

    #[inline(always)]
    pub fn record(&mut self, value: i16) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value as i64;
        self.count += 1;
    }

    /// Fold another partition's statistics for the same station into this one
    pub fn merge(&mut self, other: &Accumulator) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean in tenths, rounded half-up toward positive infinity
    ///
    /// Integer arithmetic keeps `10.25` at `103` regardless of how the
    /// float would have been rounded when printed.
    pub fn mean_tenths(&self) -> i64 {
        let count = self.count.max(1) as i128;
        let doubled = 2 * self.sum as i128 + count;
        doubled.div_euclid(2 * count) as i64
    }
}
