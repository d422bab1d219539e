//! Value types carried into and out of the algorithm driver.
//!
//! All of these are created per evaluation and never mutated in place, apart
//! from the running difficulty sum which grows by producing new values.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Identifier of one test-taker attempt.
pub type AttemptId = u64;

/// A difficulty or ability value on the logit scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyLogit(f64);

impl DifficultyLogit {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for DifficultyLogit {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Add for DifficultyLogit {
    type Output = DifficultyLogit;

    fn add(self, rhs: DifficultyLogit) -> DifficultyLogit {
        DifficultyLogit(self.0 + rhs.0)
    }
}

impl AddAssign for DifficultyLogit {
    fn add_assign(&mut self, rhs: DifficultyLogit) {
        self.0 += rhs.0;
    }
}

impl Sum for DifficultyLogit {
    fn sum<I: Iterator<Item = DifficultyLogit>>(iter: I) -> Self {
        iter.fold(DifficultyLogit::default(), Add::add)
    }
}

impl fmt::Display for DifficultyLogit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Outcome of the most recently administered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionAnswerEvaluationResult {
    /// The question was never graded.
    NotGiven,
    Correct,
    Incorrect,
}

impl QuestionAnswerEvaluationResult {
    pub fn is_correct(self) -> bool {
        self == QuestionAnswerEvaluationResult::Correct
    }

    pub fn is_answered(self) -> bool {
        self != QuestionAnswerEvaluationResult::NotGiven
    }
}

impl fmt::Display for QuestionAnswerEvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionAnswerEvaluationResult::NotGiven => write!(f, "not-given"),
            QuestionAnswerEvaluationResult::Correct => write!(f, "correct"),
            QuestionAnswerEvaluationResult::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Tally of right and wrong answers across an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionsAnsweredSummary {
    pub correct_count: u32,
    pub incorrect_count: u32,
}

impl QuestionsAnsweredSummary {
    pub fn new(correct_count: u32, incorrect_count: u32) -> Self {
        Self {
            correct_count,
            incorrect_count,
        }
    }

    /// Answers counted, widened so that any pair of counts sums exactly.
    pub fn total(&self) -> u64 {
        u64::from(self.correct_count) + u64::from(self.incorrect_count)
    }

    /// Return a new summary with one more answer counted. Unanswered
    /// questions leave the tally unchanged.
    pub fn record(self, result: QuestionAnswerEvaluationResult) -> Self {
        match result {
            QuestionAnswerEvaluationResult::Correct => Self {
                correct_count: self.correct_count.saturating_add(1),
                ..self
            },
            QuestionAnswerEvaluationResult::Incorrect => Self {
                incorrect_count: self.incorrect_count.saturating_add(1),
                ..self
            },
            QuestionAnswerEvaluationResult::NotGiven => self,
        }
    }
}

/// Model parameters accumulated across an attempt and persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CatModelParams {
    /// Running sum of the logits of every answered question's difficulty.
    pub difficulty_sum: f64,
    /// Standard error of the current measure.
    pub standard_error: f64,
    /// Current ability estimate on the logit scale.
    pub measure: f64,
}

/// Message key for an unanswered last question.
pub const ERROR_LAST_QUESTION_NOT_ANSWERED: &str = "last attempt question not answered";

/// Message key for answer tallies that disagree with the attempted count.
pub const ERROR_ANSWER_SUM_MISMATCH: &str = "sum of right/wrong answers mismatch";

/// Result of deciding the next difficulty level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetermineNextDifficultyResult {
    /// The level could not be determined; `message` is a user-facing key.
    Error { message: String },
    /// The next question should be drawn at `next_level`.
    Determined { next_level: i64 },
}

impl DetermineNextDifficultyResult {
    pub fn error(message: impl Into<String>) -> Self {
        DetermineNextDifficultyResult::Error {
            message: message.into(),
        }
    }

    pub fn determined(next_level: i64) -> Self {
        DetermineNextDifficultyResult::Determined { next_level }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DetermineNextDifficultyResult::Error { .. })
    }

    pub fn next_level(&self) -> Option<i64> {
        match self {
            DetermineNextDifficultyResult::Determined { next_level } => Some(*next_level),
            DetermineNextDifficultyResult::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DetermineNextDifficultyResult::Error { message } => Some(message),
            DetermineNextDifficultyResult::Determined { .. } => None,
        }
    }
}

impl fmt::Display for DetermineNextDifficultyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetermineNextDifficultyResult::Error { message } => write!(f, "error: {message}"),
            DetermineNextDifficultyResult::Determined { next_level } => {
                write!(f, "next level {next_level}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logits_accumulate() {
        let sum: DifficultyLogit = [0.5, -0.25, 1.0]
            .into_iter()
            .map(DifficultyLogit::from)
            .sum();
        assert!((sum.value() - 1.25).abs() < f64::EPSILON);

        let mut running = DifficultyLogit::new(2.0);
        running += DifficultyLogit::new(-0.5);
        assert_eq!(running, DifficultyLogit::new(1.5));
    }

    #[test]
    fn summary_records_answers() {
        let summary = QuestionsAnsweredSummary::default()
            .record(QuestionAnswerEvaluationResult::Correct)
            .record(QuestionAnswerEvaluationResult::Incorrect)
            .record(QuestionAnswerEvaluationResult::NotGiven)
            .record(QuestionAnswerEvaluationResult::Correct);
        assert_eq!(summary, QuestionsAnsweredSummary::new(2, 1));
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn summary_total_does_not_overflow() {
        let summary = QuestionsAnsweredSummary::new(u32::MAX, u32::MAX);
        assert_eq!(summary.total(), 2 * u64::from(u32::MAX));
        assert_eq!(
            summary.record(QuestionAnswerEvaluationResult::Correct),
            summary
        );
    }

    #[test]
    fn result_equality_compares_variant_and_payload() {
        assert_eq!(
            DetermineNextDifficultyResult::determined(5),
            DetermineNextDifficultyResult::Determined { next_level: 5 }
        );
        assert_ne!(
            DetermineNextDifficultyResult::determined(5),
            DetermineNextDifficultyResult::determined(6)
        );
        assert_ne!(
            DetermineNextDifficultyResult::error("a"),
            DetermineNextDifficultyResult::error("b")
        );
        let err = DetermineNextDifficultyResult::error(ERROR_ANSWER_SUM_MISMATCH);
        assert_eq!(err.error_message(), Some(ERROR_ANSWER_SUM_MISMATCH));
        assert_eq!(err.next_level(), None);
    }

    #[test]
    fn result_serializes_with_kind_tag() {
        let json = serde_json::to_string(&DetermineNextDifficultyResult::determined(42)).unwrap();
        assert_eq!(json, r#"{"kind":"determined","next_level":42}"#);
    }
}
