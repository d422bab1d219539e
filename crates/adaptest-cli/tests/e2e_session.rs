//! End-to-end attempt tests driving the library the way a quiz session does.
//!
//! Each answer is recorded in the question usage, evaluated by the configured
//! strategy and the resulting parameters persisted in the params store.

use std::sync::Arc;

use adaptest_core::administration::{
    AdministrationOutcome, AdministrationRegistry, AttemptSnapshot, ItemAdministration,
    ItemAdministrationFactory,
};
use adaptest_core::config::ActivityConfig;
use adaptest_core::logit::convert_linear_to_logit;
use adaptest_core::simulation::{ScriptedResponder, Simulator};
use adaptest_core::stopping::StopDecision;
use adaptest_core::store::{CatModelParamsStore, InMemoryParamsStore};
use adaptest_core::types::AttemptId;
use adaptest_core::usage::{InMemoryUsage, QuestionUsage, SlotRecord};
use adaptest_core::{
    CatResult, DetermineNextDifficultyResult, DifficultyRange, QuestionAnswerEvaluationResult,
    QuestionsAnsweredSummary,
};

const ATTEMPT: AttemptId = 42;

fn activity() -> ActivityConfig {
    ActivityConfig {
        lowest_level: 0,
        highest_level: 100,
        starting_level: 30,
        max_questions: 4,
        ..ActivityConfig::default()
    }
}

/// Record an answer and run one evaluation, persisting the new parameters.
fn answer(
    administration: &dyn ItemAdministration,
    usage: &mut InMemoryUsage,
    store: &InMemoryParamsStore,
    record: SlotRecord,
) -> AdministrationOutcome {
    usage.add_slot(ATTEMPT, record);
    let prior = store.load(ATTEMPT).unwrap().unwrap_or_default();
    let outcome = administration
        .evaluate(
            &*usage,
            &AttemptSnapshot {
                attempt: ATTEMPT,
                prior,
            },
        )
        .unwrap();
    store.save(ATTEMPT, outcome.params).unwrap();
    outcome
}

#[test]
fn e2e_session_tracks_levels_and_params() {
    let config = activity();
    let range = config.range().unwrap();
    let administration = AdministrationRegistry::with_defaults()
        .create_for(&config)
        .unwrap();
    let mut usage = InMemoryUsage::new();
    let store = InMemoryParamsStore::new();

    let first_level = administration.current_level(&usage, ATTEMPT).unwrap();
    assert_eq!(first_level, 30);

    let first = answer(
        administration.as_ref(),
        &mut usage,
        &store,
        SlotRecord::graded(2.0, 2.0, first_level),
    );
    assert_eq!(first.next, DetermineNextDifficultyResult::determined(76));
    assert_eq!(first.answer, QuestionAnswerEvaluationResult::Correct);
    assert_eq!(first.stop, StopDecision::Continue);
    assert_eq!(administration.current_level(&usage, ATTEMPT).unwrap(), 76);

    let second = answer(
        administration.as_ref(),
        &mut usage,
        &store,
        SlotRecord::graded(0.0, 2.0, 76),
    );
    let second_next = second.next.next_level().unwrap();
    assert!(second_next < 76, "incorrect answer should lower the level");
    assert_eq!(
        administration.current_level(&usage, ATTEMPT).unwrap(),
        second_next
    );
    assert_eq!(second.questions_attempted, 2);

    let stored = store.load(ATTEMPT).unwrap().unwrap();
    let expected_sum =
        convert_linear_to_logit(30, &range) + convert_linear_to_logit(76, &range);
    assert!((stored.difficulty_sum - expected_sum).abs() < 1e-9);
    // One right and one wrong: sqrt(2 / (1 * 1)).
    assert!((stored.standard_error - 2f64.sqrt()).abs() < 1e-9);
    assert!((stored.measure - expected_sum / 2.0).abs() < 1e-9);
}

#[test]
fn e2e_unanswered_question_keeps_params() {
    let config = activity();
    let administration = AdministrationRegistry::with_defaults()
        .create_for(&config)
        .unwrap();
    let mut usage = InMemoryUsage::new();
    let store = InMemoryParamsStore::new();

    answer(
        administration.as_ref(),
        &mut usage,
        &store,
        SlotRecord::graded(1.0, 1.0, 30),
    );
    let before = store.load(ATTEMPT).unwrap().unwrap();

    let skipped = answer(
        administration.as_ref(),
        &mut usage,
        &store,
        SlotRecord::ungraded(1.0, 76),
    );
    assert!(skipped.next.is_error());
    assert_eq!(skipped.answer, QuestionAnswerEvaluationResult::NotGiven);
    assert_eq!(store.load(ATTEMPT).unwrap().unwrap(), before);

    // Grading the slot later lets the attempt continue.
    let slot = *usage.administered_slots(ATTEMPT).last().unwrap();
    assert!(usage.update_slot(slot, SlotRecord::graded(1.0, 1.0, 76)));
    let prior = store.load(ATTEMPT).unwrap().unwrap();
    let resumed = administration
        .evaluate(
            &usage,
            &AttemptSnapshot {
                attempt: ATTEMPT,
                prior,
            },
        )
        .unwrap();
    let resumed_next = resumed.next.next_level().unwrap();
    assert!(resumed_next > 76);
    assert_eq!(
        administration.current_level(&usage, ATTEMPT).unwrap(),
        resumed_next
    );
    assert_eq!(
        QuestionsAnsweredSummary::from_usage(&usage, ATTEMPT),
        QuestionsAnsweredSummary::new(2, 0)
    );
}

#[test]
fn e2e_attempts_are_isolated() {
    let config = activity();
    let administration = AdministrationRegistry::with_defaults()
        .create_for(&config)
        .unwrap();
    let mut usage = InMemoryUsage::new();

    usage.add_slot(1, SlotRecord::graded(1.0, 1.0, 30));
    usage.add_slot(2, SlotRecord::graded(0.0, 1.0, 30));

    assert_eq!(administration.current_level(&usage, 1).unwrap(), 76);
    assert_eq!(administration.current_level(&usage, 2).unwrap(), 5);
    assert_eq!(administration.current_level(&usage, 3).unwrap(), 30);
}

/// Walks up the scale by a fixed amount regardless of the answer.
struct FixedStep {
    step: i64,
    range: DifficultyRange,
    config: ActivityConfig,
}

impl ItemAdministration for FixedStep {
    fn strategy(&self) -> &str {
        "fixed-step"
    }

    fn current_level(&self, usage: &dyn QuestionUsage, attempt: AttemptId) -> CatResult<i64> {
        let last = usage
            .administered_slots(attempt)
            .last()
            .and_then(|&slot| usage.slot(slot));
        Ok(match last {
            Some(record) => self.range.clamp(record.difficulty + self.step),
            None => self.range.clamp(self.config.starting_level),
        })
    }

    fn evaluate(
        &self,
        usage: &dyn QuestionUsage,
        snapshot: &AttemptSnapshot,
    ) -> CatResult<AdministrationOutcome> {
        let questions_attempted = usage.administered_slots(snapshot.attempt).len() as u32;
        let stop = if questions_attempted >= self.config.max_questions {
            StopDecision::MaxQuestionsReached
        } else {
            StopDecision::Continue
        };
        Ok(AdministrationOutcome {
            next: DetermineNextDifficultyResult::determined(
                self.current_level(usage, snapshot.attempt)?,
            ),
            stop,
            params: snapshot.prior,
            answer: QuestionAnswerEvaluationResult::Correct,
            questions_attempted,
        })
    }
}

struct FixedStepFactory;

impl ItemAdministrationFactory for FixedStepFactory {
    fn strategy(&self) -> &str {
        "fixed-step"
    }

    fn create(&self, config: &ActivityConfig) -> CatResult<Box<dyn ItemAdministration>> {
        Ok(Box::new(FixedStep {
            step: 10,
            range: config.range()?,
            config: config.clone(),
        }))
    }
}

#[test]
fn e2e_registered_strategy_drives_simulation() {
    let mut registry = AdministrationRegistry::with_defaults();
    registry.register(Arc::new(FixedStepFactory));
    assert_eq!(registry.strategies(), vec!["catalgo", "fixed-step"]);

    let config = ActivityConfig {
        strategy: "fixed-step".into(),
        ..activity()
    };
    let administration = registry.create_for(&config).unwrap();
    let responder = ScriptedResponder::parse("C").unwrap();
    let report = Simulator::default()
        .run(administration.as_ref(), &responder, &config, ATTEMPT)
        .unwrap();

    let levels: Vec<i64> = report.steps.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![30, 40, 50, 60]);
    assert_eq!(report.strategy, "fixed-step");
    assert_eq!(report.stop, StopDecision::MaxQuestionsReached);
}

#[test]
fn e2e_simulation_shares_store_with_caller() {
    let config = activity();
    let store = Arc::new(InMemoryParamsStore::new());
    let administration = AdministrationRegistry::with_defaults()
        .create_for(&config)
        .unwrap();
    let responder = ScriptedResponder::parse("CICI").unwrap();

    let report = Simulator::new(store.clone())
        .run(administration.as_ref(), &responder, &config, ATTEMPT)
        .unwrap();

    assert_eq!(report.steps.len(), 4);
    assert_eq!(store.load(ATTEMPT).unwrap(), Some(report.final_params));
    assert!(store.load(ATTEMPT + 1).unwrap().is_none());
}
