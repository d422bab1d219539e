//! The `adaptest next` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use adaptest_core::config::load_config_from;
use adaptest_core::measure::estimate_standard_error;
use adaptest_core::stopping::StopDecision;
use adaptest_core::{
    determine_next_difficulty_level, DetermineNextDifficultyResult,
    QuestionAnswerEvaluationResult, QuestionsAnsweredSummary,
};

/// Outcome of the last administered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LastAnswer {
    Correct,
    Incorrect,
    /// The question was not answered.
    None,
}

impl From<LastAnswer> for QuestionAnswerEvaluationResult {
    fn from(last: LastAnswer) -> Self {
        match last {
            LastAnswer::Correct => QuestionAnswerEvaluationResult::Correct,
            LastAnswer::Incorrect => QuestionAnswerEvaluationResult::Incorrect,
            LastAnswer::None => QuestionAnswerEvaluationResult::NotGiven,
        }
    }
}

#[derive(Serialize)]
struct NextOutput {
    result: DetermineNextDifficultyResult,
    stop: StopDecision,
}

pub fn execute(
    level: i64,
    attempted: u32,
    correct: u32,
    incorrect: u32,
    last: LastAnswer,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let range = config.activity.range()?;
    let criteria = config.activity.criteria();
    let summary = QuestionsAnsweredSummary::new(correct, incorrect);

    let result = determine_next_difficulty_level(
        level,
        attempted,
        &range,
        criteria.level_hold_threshold(attempted)?,
        last.into(),
        summary,
    )?;

    let stop = if result.is_error() {
        StopDecision::Continue
    } else {
        criteria.evaluate(attempted, estimate_standard_error(attempted, correct, incorrect)?)?
    };

    match format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&NextOutput { result, stop })?
            );
        }
        _ => {
            match &result {
                DetermineNextDifficultyResult::Determined { next_level } => {
                    println!("Next level: {next_level}");
                }
                DetermineNextDifficultyResult::Error { message } => {
                    println!("Not determined: {message}");
                }
            }
            if stop.should_stop() {
                println!("Stop: {stop}");
            }
        }
    }

    Ok(())
}
