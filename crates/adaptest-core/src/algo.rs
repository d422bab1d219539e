//! The adaptive item-selection algorithm.
//!
//! Each answered question moves the target difficulty on the logit scale by a
//! step of `2 / questions_attempted`: up after a right answer, down after a
//! wrong one. Steps shrink as the attempt goes on, so the target settles around
//! the taker's ability.

use crate::error::{CatError, CatResult};
use crate::logit::{convert_linear_to_logit, map_logit_to_scale};
use crate::measure::{estimate_standard_error, standard_error_within_parameters};
use crate::range::DifficultyRange;
use crate::types::{
    AttemptId, DetermineNextDifficultyResult, QuestionAnswerEvaluationResult,
    QuestionsAnsweredSummary, ERROR_ANSWER_SUM_MISMATCH, ERROR_LAST_QUESTION_NOT_ANSWERED,
};
use crate::usage::{QuestionUsage, SlotState};

/// Logit distance covered by the first step.
const INITIAL_STEP: f64 = 2.0;

/// Configuration for [`CatAlgo`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatAlgoConfig {
    /// Read marks as fractions of the question's maximum mark, and start
    /// attempts at `default_level` rather than the bottom of the range.
    pub return_fraction: bool,
    /// Level of the first question of an attempt. Required.
    pub default_level: Option<i64>,
}

/// Algorithm driver reading answered questions from a [`QuestionUsage`].
#[derive(Debug, Clone, Copy)]
pub struct CatAlgo {
    return_fraction: bool,
    default_level: i64,
}

impl CatAlgo {
    pub fn new(config: CatAlgoConfig) -> CatResult<Self> {
        let default_level = config.default_level.ok_or(CatError::MissingDefaultLevel)?;
        Ok(Self {
            return_fraction: config.return_fraction,
            default_level,
        })
    }

    pub fn return_fraction(&self) -> bool {
        self.return_fraction
    }

    pub fn default_level(&self) -> i64 {
        self.default_level
    }

    /// The numeric mark of `slot`, or `None` when the slot is unknown or has
    /// no usable mark.
    pub fn get_question_mark(&self, usage: &dyn QuestionUsage, slot: u32) -> Option<f64> {
        let record = usage.slot(slot)?;
        let mark = record.mark.filter(|mark| mark.is_finite())?;
        if self.return_fraction && record.max_mark > 0.0 {
            Some(mark / record.max_mark)
        } else {
            Some(mark)
        }
    }

    /// The difficulty level the next question of `attempt` should have.
    pub fn get_current_diff_level(
        &self,
        usage: &dyn QuestionUsage,
        attempt: AttemptId,
        range: &DifficultyRange,
    ) -> CatResult<i64> {
        let slots = usage.administered_slots(attempt);
        let Some(&last) = slots.last() else {
            let level = if self.return_fraction {
                range.clamp(self.default_level)
            } else {
                range.low()
            };
            tracing::debug!(attempt, level, "no questions administered yet");
            return Ok(level);
        };

        let record = usage.slot(last).ok_or(CatError::UnknownSlot(last))?;
        if record.state == SlotState::Ungraded {
            tracing::debug!(attempt, slot = last, "last question not answered, level unchanged");
            return Ok(range.clamp(record.difficulty));
        }
        let correct = match self.get_question_mark(usage, last) {
            Some(mark) => mark > 0.0,
            None => {
                tracing::warn!(attempt, slot = last, "mark unavailable, treating as incorrect");
                false
            }
        };

        compute_next_difficulty(record.difficulty, slots.len() as u32, correct, range)
    }
}

/// Compute the next target difficulty after an answer at `current_level`.
///
/// The result is always within `range`.
pub fn compute_next_difficulty(
    current_level: i64,
    questions_attempted: u32,
    was_correct: bool,
    range: &DifficultyRange,
) -> CatResult<i64> {
    if questions_attempted == 0 {
        return Err(CatError::NoQuestionsAttempted);
    }

    let difficulty = convert_linear_to_logit(current_level, range);
    let step = INITIAL_STEP / questions_attempted as f64;
    let next_difficulty = if was_correct {
        difficulty + step
    } else {
        difficulty - step
    };

    let level = map_logit_to_scale(next_difficulty, range).round() as i64;
    let next_level = range.clamp(level);
    tracing::debug!(
        current_level,
        questions_attempted,
        was_correct,
        next_level,
        "computed next difficulty"
    );
    Ok(next_level)
}

/// Decide the level of the next question.
///
/// Data problems (unanswered last question, inconsistent tallies) come back as
/// [`DetermineNextDifficultyResult::Error`]. Once the standard error is within
/// `standard_error_threshold` the current level is returned unchanged; callers
/// check the stopping criteria separately.
pub fn determine_next_difficulty_level(
    current_level: i64,
    questions_attempted: u32,
    range: &DifficultyRange,
    standard_error_threshold: f64,
    answer: QuestionAnswerEvaluationResult,
    summary: QuestionsAnsweredSummary,
) -> CatResult<DetermineNextDifficultyResult> {
    if !answer.is_answered() {
        return Ok(DetermineNextDifficultyResult::error(
            ERROR_LAST_QUESTION_NOT_ANSWERED,
        ));
    }

    if summary.total() != u64::from(questions_attempted) {
        tracing::warn!(
            questions_attempted,
            correct = summary.correct_count,
            incorrect = summary.incorrect_count,
            "answer tallies do not match questions attempted"
        );
        return Ok(DetermineNextDifficultyResult::error(ERROR_ANSWER_SUM_MISMATCH));
    }

    let standard_error = estimate_standard_error(
        questions_attempted,
        summary.correct_count,
        summary.incorrect_count,
    )?;
    if standard_error_within_parameters(standard_error, standard_error_threshold) {
        tracing::debug!(standard_error, "standard error within threshold");
        return Ok(DetermineNextDifficultyResult::determined(current_level));
    }

    let next_level =
        compute_next_difficulty(current_level, questions_attempted, answer.is_correct(), range)?;
    Ok(DetermineNextDifficultyResult::determined(next_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::{InMemoryUsage, SlotRecord};

    fn range(low: i64, high: i64) -> DifficultyRange {
        DifficultyRange::new(low, high).unwrap()
    }

    fn algo(return_fraction: bool, default_level: i64) -> CatAlgo {
        CatAlgo::new(CatAlgoConfig {
            return_fraction,
            default_level: Some(default_level),
        })
        .unwrap()
    }

    #[test]
    fn next_difficulty_first_question() {
        let r = range(0, 100);
        assert_eq!(compute_next_difficulty(30, 1, false, &r).unwrap(), 5);
        assert_eq!(compute_next_difficulty(30, 1, true, &r).unwrap(), 76);
    }

    #[test]
    fn next_difficulty_second_question() {
        let r = range(0, 100);
        assert_eq!(compute_next_difficulty(80, 2, false, &r).unwrap(), 60);
        assert_eq!(compute_next_difficulty(80, 2, true, &r).unwrap(), 92);
    }

    #[test]
    fn next_difficulty_clamps_to_range() {
        let r = range(1, 10);
        assert_eq!(compute_next_difficulty(1, 2, false, &r).unwrap(), 1);
        assert_eq!(compute_next_difficulty(10, 2, true, &r).unwrap(), 10);
    }

    #[test]
    fn next_difficulty_always_within_range() {
        for (low, high) in [(0, 100), (1, 10), (-5, 5), (1, 2)] {
            let r = range(low, high);
            for level in low..=high {
                for attempted in 1..=12 {
                    for correct in [true, false] {
                        let next = compute_next_difficulty(level, attempted, correct, &r).unwrap();
                        assert!(r.contains(next), "{level}/{attempted}/{correct} -> {next}");
                    }
                }
            }
        }
    }

    #[test]
    fn next_difficulty_near_integer_limits() {
        let top = range(i64::MAX - 10, i64::MAX);
        for level in [i64::MAX - 10, i64::MAX - 5, i64::MAX] {
            for correct in [true, false] {
                let next = compute_next_difficulty(level, 1, correct, &top).unwrap();
                assert!(top.contains(next), "{level}/{correct} -> {next}");
            }
        }

        let bottom = range(i64::MIN, i64::MIN + 10);
        let next = compute_next_difficulty(i64::MIN + 5, 1, false, &bottom).unwrap();
        assert!(bottom.contains(next));
    }

    #[test]
    fn next_difficulty_rejects_zero_attempts() {
        assert_eq!(
            compute_next_difficulty(50, 0, true, &range(0, 100)),
            Err(CatError::NoQuestionsAttempted)
        );
    }

    #[test]
    fn determine_not_given_is_error() {
        for (attempted, summary) in [
            (10, QuestionsAnsweredSummary::new(7, 3)),
            (3, QuestionsAnsweredSummary::new(0, 0)),
        ] {
            let result = determine_next_difficulty_level(
                30,
                attempted,
                &range(0, 100),
                0.2,
                QuestionAnswerEvaluationResult::NotGiven,
                summary,
            )
            .unwrap();
            assert_eq!(
                result,
                DetermineNextDifficultyResult::error(ERROR_LAST_QUESTION_NOT_ANSWERED)
            );
        }
    }

    #[test]
    fn determine_mismatched_sum_is_error() {
        let result = determine_next_difficulty_level(
            30,
            5,
            &range(0, 100),
            0.2,
            QuestionAnswerEvaluationResult::Correct,
            QuestionsAnsweredSummary::new(3, 1),
        )
        .unwrap();
        assert_eq!(
            result,
            DetermineNextDifficultyResult::error(ERROR_ANSWER_SUM_MISMATCH)
        );
    }

    #[test]
    fn determine_overflowing_tally_is_mismatch() {
        let result = determine_next_difficulty_level(
            30,
            5,
            &range(0, 100),
            0.2,
            QuestionAnswerEvaluationResult::Correct,
            QuestionsAnsweredSummary::new(u32::MAX, 1),
        )
        .unwrap();
        assert_eq!(
            result,
            DetermineNextDifficultyResult::error(ERROR_ANSWER_SUM_MISMATCH)
        );
    }

    #[test]
    fn determine_moves_level_while_error_is_large() {
        let result = determine_next_difficulty_level(
            30,
            1,
            &range(0, 100),
            0.2,
            QuestionAnswerEvaluationResult::Correct,
            QuestionsAnsweredSummary::new(1, 0),
        )
        .unwrap();
        assert_eq!(result, DetermineNextDifficultyResult::determined(76));
    }

    #[test]
    fn determine_keeps_level_once_error_is_small() {
        let result = determine_next_difficulty_level(
            42,
            400,
            &range(0, 100),
            0.2,
            QuestionAnswerEvaluationResult::Incorrect,
            QuestionsAnsweredSummary::new(200, 200),
        )
        .unwrap();
        assert_eq!(result, DetermineNextDifficultyResult::determined(42));
    }

    #[test]
    fn determine_with_zero_attempts_is_domain_violation() {
        let result = determine_next_difficulty_level(
            42,
            0,
            &range(0, 100),
            0.2,
            QuestionAnswerEvaluationResult::Correct,
            QuestionsAnsweredSummary::new(0, 0),
        );
        assert_eq!(result, Err(CatError::NoQuestionsAttempted));
    }

    #[test]
    fn construction_requires_default_level() {
        assert_eq!(
            CatAlgo::new(CatAlgoConfig::default()).unwrap_err(),
            CatError::MissingDefaultLevel
        );
        assert_eq!(algo(true, 7).default_level(), 7);
    }

    #[test]
    fn fallback_level_depends_on_return_fraction() {
        let usage = InMemoryUsage::new();
        let r = range(1, 100);
        assert_eq!(algo(true, 40).get_current_diff_level(&usage, 1, &r).unwrap(), 40);
        assert_eq!(algo(false, 40).get_current_diff_level(&usage, 1, &r).unwrap(), 1);
        assert_eq!(algo(true, 400).get_current_diff_level(&usage, 1, &r).unwrap(), 100);
    }

    #[test]
    fn current_level_follows_last_answer() {
        let r = range(0, 100);
        let mut usage = InMemoryUsage::new();
        usage.add_slot(9, SlotRecord::graded(1.0, 1.0, 30));
        assert_eq!(algo(true, 50).get_current_diff_level(&usage, 9, &r).unwrap(), 76);

        let mut usage = InMemoryUsage::new();
        usage.add_slot(9, SlotRecord::graded(0.0, 1.0, 30));
        assert_eq!(algo(true, 50).get_current_diff_level(&usage, 9, &r).unwrap(), 5);

        let mut usage = InMemoryUsage::new();
        usage.add_slot(9, SlotRecord::graded(1.0, 1.0, 50));
        usage.add_slot(9, SlotRecord::graded(0.0, 1.0, 80));
        assert_eq!(algo(false, 50).get_current_diff_level(&usage, 9, &r).unwrap(), 60);
    }

    #[test]
    fn ungraded_last_question_keeps_level() {
        let r = range(0, 100);
        let mut usage = InMemoryUsage::new();
        usage.add_slot(5, SlotRecord::graded(1.0, 1.0, 30));
        usage.add_slot(5, SlotRecord::ungraded(1.0, 76));
        assert_eq!(algo(true, 50).get_current_diff_level(&usage, 5, &r).unwrap(), 76);
        assert_eq!(algo(false, 50).get_current_diff_level(&usage, 5, &r).unwrap(), 76);
    }

    #[test]
    fn unavailable_mark_counts_as_incorrect() {
        let r = range(0, 100);
        let mut usage = InMemoryUsage::new();
        usage.add_slot(
            3,
            SlotRecord {
                state: SlotState::Graded,
                mark: Some(f64::NAN),
                max_mark: 1.0,
                difficulty: 30,
            },
        );
        let algo = algo(true, 50);
        assert_eq!(algo.get_question_mark(&usage, 1), None);
        assert_eq!(algo.get_current_diff_level(&usage, 3, &r).unwrap(), 5);
    }

    #[test]
    fn question_mark_as_fraction() {
        let mut usage = InMemoryUsage::new();
        usage.add_slot(1, SlotRecord::graded(2.0, 4.0, 10));
        usage.add_slot(1, SlotRecord::ungraded(4.0, 10));

        assert_eq!(algo(true, 1).get_question_mark(&usage, 1), Some(0.5));
        assert_eq!(algo(false, 1).get_question_mark(&usage, 1), Some(2.0));
        assert_eq!(algo(true, 1).get_question_mark(&usage, 2), None);
        assert_eq!(algo(true, 1).get_question_mark(&usage, 99), None);
    }
}
