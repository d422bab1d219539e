//! The configured difficulty scale of an activity.

use serde::{Deserialize, Serialize};

use crate::error::{CatError, CatResult};

/// Inclusive `[low, high]` bounds of the linear difficulty scale.
///
/// Construction guarantees `low < high`, so the width is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub struct DifficultyRange {
    low: i64,
    high: i64,
}

#[derive(Serialize, Deserialize)]
struct RawRange {
    low: i64,
    high: i64,
}

impl TryFrom<RawRange> for DifficultyRange {
    type Error = CatError;

    fn try_from(raw: RawRange) -> CatResult<Self> {
        DifficultyRange::new(raw.low, raw.high)
    }
}

impl From<DifficultyRange> for RawRange {
    fn from(range: DifficultyRange) -> Self {
        RawRange {
            low: range.low,
            high: range.high,
        }
    }
}

impl DifficultyRange {
    /// Create a range from an activity's lowest and highest levels.
    pub fn new(low: i64, high: i64) -> CatResult<Self> {
        if low >= high {
            return Err(CatError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    /// Distance between the bounds, used as the scale factor.
    pub fn width(&self) -> f64 {
        (i128::from(self.high) - i128::from(self.low)) as f64
    }

    /// Centre of the scale, the origin of logit zero.
    pub fn midpoint(&self) -> f64 {
        (i128::from(self.low) + i128::from(self.high)) as f64 / 2.0
    }

    pub fn clamp(&self, level: i64) -> i64 {
        level.clamp(self.low, self.high)
    }

    pub fn contains(&self, level: i64) -> bool {
        (self.low..=self.high).contains(&level)
    }
}
