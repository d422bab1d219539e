//! adaptest-core: computerized adaptive testing engine.
//!
//! Converts between a linear difficulty scale and the logit scale, estimates
//! a taker's ability measure and its standard error, picks the difficulty of
//! the next question and decides when an attempt should stop.
//!
//! Everything here is pure computation. Question state, persistence and
//! difficulty-tag lookup live behind the collaborator traits in [`usage`] and
//! [`store`].

pub mod administration;
pub mod algo;
pub mod config;
pub mod error;
pub mod logit;
pub mod measure;
pub mod range;
pub mod simulation;
pub mod stopping;
pub mod store;
pub mod types;
pub mod usage;

pub use algo::{compute_next_difficulty, determine_next_difficulty_level, CatAlgo, CatAlgoConfig};
pub use error::{CatError, CatResult};
pub use range::DifficultyRange;
pub use types::{
    CatModelParams, DetermineNextDifficultyResult, DifficultyLogit,
    QuestionAnswerEvaluationResult, QuestionsAnsweredSummary,
};
