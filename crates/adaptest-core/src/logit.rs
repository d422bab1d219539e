//! Conversions between the linear difficulty scale and the logit scale.
//!
//! Percents here are offsets from the midpoint of a probability scale, so the
//! valid percent domain is `[0, 0.5]` and the valid logit domain is `>= 0`.
//! Signed values are handled by the scale mappings, which convert the magnitude
//! and reapply the sign.

use crate::error::{CatError, CatResult};
use crate::range::DifficultyRange;

/// Levels at the very edge of the scale would map to an infinite logit, so the
/// fractional position on the scale is kept this far away from 0 and 1.
const EDGE_MARGIN: f64 = 0.01;

/// Convert a percent offset from the midpoint to a logit.
///
/// `logit = ln((0.5 + p) / (0.5 - p))`
pub fn convert_percent_to_logit(percent: f64) -> CatResult<f64> {
    if !(0.0..=0.5).contains(&percent) {
        return Err(CatError::PercentOutOfRange(percent));
    }
    Ok(percent_to_logit(percent))
}

/// Convert a non-negative logit back to a percent offset from the midpoint.
///
/// `p = 1 / (1 + e^-logit) - 0.5`
pub fn convert_logit_to_percent(logit: f64) -> CatResult<f64> {
    if logit < 0.0 {
        return Err(CatError::NegativeLogit(logit));
    }
    Ok(logit_to_percent(logit))
}

/// Rescale a logit onto the linear difficulty scale of `range`.
///
/// The result is not rounded or clamped.
pub fn map_logit_to_scale(logit: f64, range: &DifficultyRange) -> f64 {
    let offset = logit_to_percent(logit.abs()).copysign(logit);
    range.midpoint() + offset * range.width()
}

/// Convert a linear difficulty level to a logit relative to the range midpoint.
pub fn convert_linear_to_logit(level: i64, range: &DifficultyRange) -> f64 {
    let distance = (i128::from(level) - i128::from(range.low())) as f64;
    let fraction = (distance / range.width()).clamp(EDGE_MARGIN, 1.0 - EDGE_MARGIN);
    let offset = fraction - 0.5;
    percent_to_logit(offset.abs()).copysign(offset)
}

fn percent_to_logit(percent: f64) -> f64 {
    ((0.5 + percent) / (0.5 - percent)).ln()
}

pub(crate) fn logit_to_percent(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp()) - 0.5
}
