//! Rasch-model ability measure and standard error estimation.

use serde::{Deserialize, Serialize};

use crate::error::{CatError, CatResult};
use crate::logit::{logit_to_percent, map_logit_to_scale};
use crate::range::DifficultyRange;

/// Answer counts with the half-count correction applied when either is zero,
/// so the ratio and product stay finite for all-right or all-wrong attempts.
fn corrected_counts(num_correct: u32, num_incorrect: u32) -> (f64, f64) {
    if num_correct == 0 || num_incorrect == 0 {
        (num_correct as f64 + 0.5, num_incorrect as f64 + 0.5)
    } else {
        (num_correct as f64, num_incorrect as f64)
    }
}

/// Standard error of the measure: `sqrt(attempted / (correct * incorrect))`.
pub fn estimate_standard_error(
    questions_attempted: u32,
    num_correct: u32,
    num_incorrect: u32,
) -> CatResult<f64> {
    if questions_attempted == 0 {
        return Err(CatError::NoQuestionsAttempted);
    }
    let (correct, incorrect) = corrected_counts(num_correct, num_incorrect);
    Ok((questions_attempted as f64 / (correct * incorrect)).sqrt())
}

/// Ability measure: mean administered difficulty plus `ln(correct / incorrect)`.
pub fn estimate_measure(
    difficulty_sum: f64,
    questions_attempted: u32,
    num_correct: u32,
    num_incorrect: u32,
) -> CatResult<f64> {
    if questions_attempted == 0 {
        return Err(CatError::NoQuestionsAttempted);
    }
    let (correct, incorrect) = corrected_counts(num_correct, num_incorrect);
    Ok(difficulty_sum / questions_attempted as f64 + (correct / incorrect).ln())
}

/// Whether the standard error has shrunk enough to stop testing.
pub fn standard_error_within_parameters(standard_error: f64, threshold: f64) -> bool {
    standard_error <= threshold
}

/// Map an ability measure onto the linear difficulty scale for display.
pub fn measure_to_scale(measure: f64, range: &DifficultyRange) -> f64 {
    map_logit_to_scale(measure, range)
}

/// Express a standard error as a percent of the scale.
pub fn standard_error_to_percent(standard_error: f64) -> f64 {
    logit_to_percent(standard_error.abs()) * 100.0
}

/// A displayable summary of a taker's estimated ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityReport {
    pub measure: f64,
    pub measure_on_scale: f64,
    pub standard_error: f64,
    pub standard_error_percent: f64,
}

impl AbilityReport {
    pub fn new(measure: f64, standard_error: f64, range: &DifficultyRange) -> Self {
        Self {
            measure,
            measure_on_scale: measure_to_scale(measure, range),
            standard_error,
            standard_error_percent: standard_error_to_percent(standard_error),
        }
    }
}
