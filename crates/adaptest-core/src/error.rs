//! Error types for the adaptive testing core.
//!
//! These represent argument-domain violations: inputs that no valid caller
//! should ever produce. Data conditions a caller can display to a user (an
//! unanswered question, inconsistent answer tallies) are not errors here; they
//! travel as [`DetermineNextDifficultyResult::Error`](crate::types::DetermineNextDifficultyResult).

use thiserror::Error;

/// Errors raised by the pure math and the algorithm driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatError {
    /// A percent offset outside `[0, 0.5]` was passed to the logit conversion.
    #[error("percent must be between 0 and 0.5, got {0}")]
    PercentOutOfRange(f64),

    /// A negative logit was passed to the percent conversion.
    #[error("logit must not be negative, got {0}")]
    NegativeLogit(f64),

    /// The lowest difficulty level is not strictly below the highest.
    #[error("invalid difficulty range: lowest {low} must be less than highest {high}")]
    InvalidRange { low: i64, high: i64 },

    /// An estimate was requested with zero questions attempted.
    #[error("questions attempted must be at least 1")]
    NoQuestionsAttempted,

    /// The algorithm driver was built without a default difficulty level.
    #[error("a default difficulty level is required")]
    MissingDefaultLevel,

    /// No item-administration strategy is registered under this key.
    #[error("unknown item administration strategy: {0}")]
    UnknownStrategy(String),

    /// The question usage does not know the requested slot.
    #[error("unknown question slot: {0}")]
    UnknownSlot(u32),
}

impl CatError {
    /// Returns `true` if this error came from a pure math function's domain check.
    pub fn is_domain_violation(&self) -> bool {
        matches!(
            self,
            CatError::PercentOutOfRange(_)
                | CatError::NegativeLogit(_)
                | CatError::NoQuestionsAttempted
        )
    }
}

/// Convenience alias for results carrying a [`CatError`].
pub type CatResult<T> = Result<T, CatError>;
