//! Deterministic end-to-end attempt simulation.
//!
//! Drives an [`ItemAdministration`] with a scripted or ability-based taker,
//! persisting parameters through a [`CatModelParamsStore`] exactly as a quiz
//! session would.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::administration::{AttemptSnapshot, ItemAdministration};
use crate::config::ActivityConfig;
use crate::logit::convert_linear_to_logit;
use crate::measure::AbilityReport;
use crate::range::DifficultyRange;
use crate::stopping::StopDecision;
use crate::store::{CatModelParamsStore, InMemoryParamsStore};
use crate::types::{AttemptId, CatModelParams, DetermineNextDifficultyResult};
use crate::usage::{InMemoryUsage, SlotRecord};

/// A simulated test taker.
pub trait Responder {
    /// Whether the taker answers question number `question` (0-based),
    /// administered at `level`, correctly.
    fn answer(&self, question: u32, level: i64, range: &DifficultyRange) -> bool;
}

/// Answers from a fixed pattern such as `"CCIC"`.
///
/// Once the pattern runs out the last answer repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponder {
    answers: Vec<bool>,
}

impl ScriptedResponder {
    /// Parse a pattern of `C` (correct) and `I` (incorrect), case-insensitive.
    pub fn parse(pattern: &str) -> Result<Self> {
        let answers = pattern
            .trim()
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'C' => Ok(true),
                'I' => Ok(false),
                other => Err(anyhow::anyhow!(
                    "invalid answer '{other}' in pattern, expected C or I"
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        anyhow::ensure!(!answers.is_empty(), "answer pattern must not be empty");
        Ok(Self { answers })
    }
}

impl Responder for ScriptedResponder {
    fn answer(&self, question: u32, _level: i64, _range: &DifficultyRange) -> bool {
        self.answers
            .get(question as usize)
            .or(self.answers.last())
            .copied()
            .unwrap_or(false)
    }
}

/// Answers correctly whenever the item is easier than the taker's ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityResponder {
    /// Ability on the logit scale.
    pub ability: f64,
}

impl Responder for AbilityResponder {
    fn answer(&self, _question: u32, level: i64, range: &DifficultyRange) -> bool {
        convert_linear_to_logit(level, range) < self.ability
    }
}

/// One administered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    /// 1-based question number.
    pub question: u32,
    pub level: i64,
    pub correct: bool,
    pub next_level: i64,
    pub measure: f64,
    pub standard_error: f64,
}

/// A complete simulated attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub strategy: String,
    pub steps: Vec<SimulationStep>,
    pub final_params: CatModelParams,
    pub ability: AbilityReport,
    pub stop: StopDecision,
}

impl SimulationReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

/// Runs simulated attempts against a params store.
pub struct Simulator {
    store: Arc<dyn CatModelParamsStore>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryParamsStore::new()))
    }
}

impl Simulator {
    pub fn new(store: Arc<dyn CatModelParamsStore>) -> Self {
        Self { store }
    }

    /// Simulate one attempt until the stopping criteria are met or the
    /// question limit is reached.
    pub fn run(
        &self,
        administration: &dyn ItemAdministration,
        responder: &dyn Responder,
        config: &ActivityConfig,
        attempt: AttemptId,
    ) -> Result<SimulationReport> {
        let range = config.range()?;
        let mut usage = InMemoryUsage::new();
        let mut level = administration.current_level(&usage, attempt)?;
        let mut steps = Vec::new();
        let mut stop = StopDecision::Continue;

        for question in 0..config.max_questions {
            let correct = responder.answer(question, level, &range);
            let mark = if correct { 1.0 } else { 0.0 };
            usage.add_slot(attempt, SlotRecord::graded(mark, 1.0, level));

            let prior = self.store.load(attempt)?.unwrap_or_default();
            let outcome = administration.evaluate(&usage, &AttemptSnapshot { attempt, prior })?;
            self.store.save(attempt, outcome.params)?;

            let next_level = match &outcome.next {
                DetermineNextDifficultyResult::Determined { next_level } => *next_level,
                DetermineNextDifficultyResult::Error { message } => anyhow::bail!(
                    "question {} could not be evaluated: {message}",
                    question + 1
                ),
            };

            steps.push(SimulationStep {
                question: question + 1,
                level,
                correct,
                next_level,
                measure: outcome.params.measure,
                standard_error: outcome.params.standard_error,
            });

            stop = outcome.stop;
            if stop.should_stop() {
                break;
            }
            level = next_level;
        }

        let final_params = self.store.load(attempt)?.unwrap_or_default();
        tracing::info!(
            attempt,
            questions = steps.len(),
            measure = final_params.measure,
            standard_error = final_params.standard_error,
            %stop,
            "simulation finished"
        );

        Ok(SimulationReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            strategy: administration.strategy().to_string(),
            steps,
            final_params,
            ability: AbilityReport::new(final_params.measure, final_params.standard_error, &range),
            stop,
        })
    }
}
