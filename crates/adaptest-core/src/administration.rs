//! Item administration strategies and their registry.
//!
//! A strategy turns the answered questions of an attempt into the next
//! difficulty level, updated model parameters and a stop decision. Strategies
//! are picked by an explicit key from the activity config.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algo::{determine_next_difficulty_level, CatAlgo};
use crate::config::ActivityConfig;
use crate::error::{CatError, CatResult};
use crate::logit::convert_linear_to_logit;
use crate::measure::{estimate_measure, estimate_standard_error};
use crate::range::DifficultyRange;
use crate::stopping::{StopDecision, StoppingCriteria};
use crate::types::{
    AttemptId, CatModelParams, DetermineNextDifficultyResult, DifficultyLogit,
    QuestionAnswerEvaluationResult, QuestionsAnsweredSummary,
};
use crate::usage::QuestionUsage;

/// Strategy key of [`CatItemAdministration`].
pub const CATALGO_STRATEGY: &str = "catalgo";

/// What the caller knows about an attempt before an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptSnapshot {
    pub attempt: AttemptId,
    /// Parameters persisted after the previous evaluation.
    #[serde(default)]
    pub prior: CatModelParams,
}

/// Result of evaluating the latest answer of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrationOutcome {
    pub next: DetermineNextDifficultyResult,
    pub stop: StopDecision,
    /// Parameters for the caller to persist. Unchanged from the prior ones
    /// when `next` is an error.
    pub params: CatModelParams,
    pub answer: QuestionAnswerEvaluationResult,
    pub questions_attempted: u32,
}

/// A model-specific way of administering items.
pub trait ItemAdministration: Send + Sync {
    /// Key this strategy is registered under.
    fn strategy(&self) -> &str;

    /// Level of the next question to administer in `attempt`.
    fn current_level(&self, usage: &dyn QuestionUsage, attempt: AttemptId) -> CatResult<i64>;

    /// Evaluate the most recently answered question.
    fn evaluate(
        &self,
        usage: &dyn QuestionUsage,
        snapshot: &AttemptSnapshot,
    ) -> CatResult<AdministrationOutcome>;
}

/// Builds an [`ItemAdministration`] for an activity.
pub trait ItemAdministrationFactory: Send + Sync {
    fn strategy(&self) -> &str;

    fn create(&self, config: &ActivityConfig) -> CatResult<Box<dyn ItemAdministration>>;
}

/// Factories keyed by strategy.
#[derive(Clone, Default)]
pub struct AdministrationRegistry {
    factories: HashMap<String, Arc<dyn ItemAdministrationFactory>>,
}

impl AdministrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in strategy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CatItemAdministrationFactory));
        registry
    }

    /// Register a factory, replacing any previous one with the same key.
    pub fn register(&mut self, factory: Arc<dyn ItemAdministrationFactory>) {
        self.factories.insert(factory.strategy().to_string(), factory);
    }

    pub fn contains(&self, strategy: &str) -> bool {
        self.factories.contains_key(strategy)
    }

    /// Registered strategy keys, sorted.
    pub fn strategies(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn create(
        &self,
        strategy: &str,
        config: &ActivityConfig,
    ) -> CatResult<Box<dyn ItemAdministration>> {
        let factory = self
            .factories
            .get(strategy)
            .ok_or_else(|| CatError::UnknownStrategy(strategy.to_string()))?;
        factory.create(config)
    }

    /// Create the strategy named by `config.strategy`.
    pub fn create_for(&self, config: &ActivityConfig) -> CatResult<Box<dyn ItemAdministration>> {
        self.create(&config.strategy, config)
    }
}

impl std::fmt::Debug for AdministrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdministrationRegistry")
            .field("strategies", &self.strategies())
            .finish()
    }
}

/// Factory for [`CatItemAdministration`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CatItemAdministrationFactory;

impl ItemAdministrationFactory for CatItemAdministrationFactory {
    fn strategy(&self) -> &str {
        CATALGO_STRATEGY
    }

    fn create(&self, config: &ActivityConfig) -> CatResult<Box<dyn ItemAdministration>> {
        Ok(Box::new(CatItemAdministration::new(config)?))
    }
}

/// Rasch-model item administration built on [`CatAlgo`].
#[derive(Debug, Clone)]
pub struct CatItemAdministration {
    algo: CatAlgo,
    range: DifficultyRange,
    criteria: StoppingCriteria,
}

impl CatItemAdministration {
    pub fn new(config: &ActivityConfig) -> CatResult<Self> {
        let criteria = config.criteria();
        criteria.standard_error_threshold()?;
        Ok(Self {
            algo: CatAlgo::new(config.algo_config())?,
            range: config.range()?,
            criteria,
        })
    }

    pub fn range(&self) -> &DifficultyRange {
        &self.range
    }
}

impl ItemAdministration for CatItemAdministration {
    fn strategy(&self) -> &str {
        CATALGO_STRATEGY
    }

    fn current_level(&self, usage: &dyn QuestionUsage, attempt: AttemptId) -> CatResult<i64> {
        self.algo.get_current_diff_level(usage, attempt, &self.range)
    }

    fn evaluate(
        &self,
        usage: &dyn QuestionUsage,
        snapshot: &AttemptSnapshot,
    ) -> CatResult<AdministrationOutcome> {
        let slots = usage.administered_slots(snapshot.attempt);
        let questions_attempted = slots.len() as u32;
        let last = slots.last().and_then(|&slot| usage.slot(slot));
        let answer = last
            .as_ref()
            .map(QuestionAnswerEvaluationResult::from_slot)
            .unwrap_or(QuestionAnswerEvaluationResult::NotGiven);
        let summary = QuestionsAnsweredSummary::from_usage(usage, snapshot.attempt);
        let current_level = last
            .map(|record| record.difficulty)
            .unwrap_or_else(|| self.range.clamp(self.algo.default_level()));

        let next = determine_next_difficulty_level(
            current_level,
            questions_attempted,
            &self.range,
            self.criteria.level_hold_threshold(questions_attempted)?,
            answer,
            summary,
        )?;

        if next.is_error() {
            tracing::info!(attempt = snapshot.attempt, %next, "next difficulty not determined");
            return Ok(AdministrationOutcome {
                next,
                stop: StopDecision::Continue,
                params: snapshot.prior,
                answer,
                questions_attempted,
            });
        }

        let difficulty_sum = DifficultyLogit::new(snapshot.prior.difficulty_sum)
            + DifficultyLogit::new(convert_linear_to_logit(current_level, &self.range));
        let standard_error = estimate_standard_error(
            questions_attempted,
            summary.correct_count,
            summary.incorrect_count,
        )?;
        let measure = estimate_measure(
            difficulty_sum.value(),
            questions_attempted,
            summary.correct_count,
            summary.incorrect_count,
        )?;
        let stop = self.criteria.evaluate(questions_attempted, standard_error)?;

        tracing::debug!(
            attempt = snapshot.attempt,
            questions_attempted,
            %difficulty_sum,
            standard_error,
            measure,
            %stop,
            "evaluated answer"
        );

        Ok(AdministrationOutcome {
            next,
            stop,
            params: CatModelParams {
                difficulty_sum: difficulty_sum.value(),
                standard_error,
                measure,
            },
            answer,
            questions_attempted,
        })
    }
}
