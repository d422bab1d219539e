//! Stopping criteria for an adaptive attempt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatResult;
use crate::logit::convert_percent_to_logit;
use crate::measure::standard_error_within_parameters;

/// When an attempt should end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoppingCriteria {
    /// No standard-error stop before this many questions.
    pub min_questions: u32,
    /// Hard cap on the number of questions.
    pub max_questions: u32,
    /// Target standard error as a percent of the scale (e.g. `5.0`).
    pub standard_error_percent: f64,
}

impl StoppingCriteria {
    /// The standard-error target converted to the logit scale.
    pub fn standard_error_threshold(&self) -> CatResult<f64> {
        convert_percent_to_logit(self.standard_error_percent / 100.0)
    }

    /// Threshold for holding the level steady after `questions_attempted`
    /// questions. Before `min_questions` no standard error is small enough,
    /// so the level keeps moving while the attempt must continue.
    pub fn level_hold_threshold(&self, questions_attempted: u32) -> CatResult<f64> {
        let threshold = self.standard_error_threshold()?;
        if questions_attempted >= self.min_questions {
            Ok(threshold)
        } else {
            Ok(f64::NEG_INFINITY)
        }
    }

    /// Decide whether to stop after `questions_attempted` questions.
    pub fn evaluate(
        &self,
        questions_attempted: u32,
        standard_error: f64,
    ) -> CatResult<StopDecision> {
        if questions_attempted >= self.max_questions {
            return Ok(StopDecision::MaxQuestionsReached);
        }
        if questions_attempted >= self.min_questions
            && standard_error_within_parameters(standard_error, self.standard_error_threshold()?)
        {
            return Ok(StopDecision::StandardErrorReached);
        }
        Ok(StopDecision::Continue)
    }
}

impl Default for StoppingCriteria {
    fn default() -> Self {
        Self {
            min_questions: 1,
            max_questions: 20,
            standard_error_percent: 5.0,
        }
    }
}

/// Outcome of checking the stopping criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopDecision {
    Continue,
    MaxQuestionsReached,
    StandardErrorReached,
}

impl StopDecision {
    pub fn should_stop(self) -> bool {
        self != StopDecision::Continue
    }
}

impl fmt::Display for StopDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopDecision::Continue => write!(f, "continue"),
            StopDecision::MaxQuestionsReached => write!(f, "maximum number of questions reached"),
            StopDecision::StandardErrorReached => write!(f, "standard error within target"),
        }
    }
}
