//! Question-usage collaborator.
//!
//! The quiz engine that actually holds question state sits behind
//! [`QuestionUsage`]. Adapters are responsible for turning whatever mark
//! representation they store into a plain `Option<f64>`; the core never sees
//! malformed marks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{AttemptId, QuestionAnswerEvaluationResult, QuestionsAnsweredSummary};

/// Whether a slot's question has been graded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Graded,
    Ungraded,
}

/// Snapshot of one administered question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub state: SlotState,
    /// Mark awarded, if any.
    pub mark: Option<f64>,
    /// Maximum mark available for the question.
    pub max_mark: f64,
    /// Linear difficulty level, already resolved from the question's tags.
    pub difficulty: i64,
}

impl SlotRecord {
    pub fn graded(mark: f64, max_mark: f64, difficulty: i64) -> Self {
        Self {
            state: SlotState::Graded,
            mark: Some(mark),
            max_mark,
            difficulty,
        }
    }

    pub fn ungraded(max_mark: f64, difficulty: i64) -> Self {
        Self {
            state: SlotState::Ungraded,
            mark: None,
            max_mark,
            difficulty,
        }
    }
}

/// Read access to the questions administered in an attempt.
pub trait QuestionUsage {
    /// Slot numbers administered in `attempt`, in administration order.
    fn administered_slots(&self, attempt: AttemptId) -> Vec<u32>;

    /// The state of one slot, or `None` if the slot does not exist.
    fn slot(&self, slot: u32) -> Option<SlotRecord>;
}

impl QuestionAnswerEvaluationResult {
    /// Classify a slot: ungraded slots are `NotGiven`, a positive mark is
    /// `Correct`, anything else is `Incorrect`.
    pub fn from_slot(record: &SlotRecord) -> Self {
        match (record.state, record.mark) {
            (SlotState::Ungraded, _) => QuestionAnswerEvaluationResult::NotGiven,
            (SlotState::Graded, Some(mark)) if mark > 0.0 => {
                QuestionAnswerEvaluationResult::Correct
            }
            (SlotState::Graded, _) => QuestionAnswerEvaluationResult::Incorrect,
        }
    }
}

impl QuestionsAnsweredSummary {
    /// Tally right and wrong answers over every administered slot.
    pub fn from_usage(usage: &dyn QuestionUsage, attempt: AttemptId) -> Self {
        usage
            .administered_slots(attempt)
            .into_iter()
            .filter_map(|slot| usage.slot(slot))
            .map(|record| QuestionAnswerEvaluationResult::from_slot(&record))
            .fold(QuestionsAnsweredSummary::default(), QuestionsAnsweredSummary::record)
    }
}

/// Question usage held in memory, keyed by attempt.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsage {
    slots: Vec<SlotRecord>,
    attempts: HashMap<AttemptId, Vec<u32>>,
}

impl InMemoryUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Administer a question to `attempt` and return its slot number.
    ///
    /// Slot numbers start at 1.
    pub fn add_slot(&mut self, attempt: AttemptId, record: SlotRecord) -> u32 {
        self.slots.push(record);
        let slot = self.slots.len() as u32;
        self.attempts.entry(attempt).or_default().push(slot);
        slot
    }

    /// Replace the record of an existing slot, e.g. once it has been graded.
    pub fn update_slot(&mut self, slot: u32, record: SlotRecord) -> bool {
        match slot
            .checked_sub(1)
            .and_then(|index| self.slots.get_mut(index as usize))
        {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }
}

impl QuestionUsage for InMemoryUsage {
    fn administered_slots(&self, attempt: AttemptId) -> Vec<u32> {
        self.attempts.get(&attempt).cloned().unwrap_or_default()
    }

    fn slot(&self, slot: u32) -> Option<SlotRecord> {
        slot.checked_sub(1)
            .and_then(|index| self.slots.get(index as usize))
            .copied()
    }
}
