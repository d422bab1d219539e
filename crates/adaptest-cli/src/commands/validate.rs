//! The `adaptest validate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::config::{load_config_from, validate_config};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let activity = &config.activity;

    println!(
        "Activity: levels {}..={}, start {}, {}-{} questions, standard error {}%, strategy '{}'",
        activity.lowest_level,
        activity.highest_level,
        activity.starting_level,
        activity.min_questions,
        activity.max_questions,
        activity.standard_error_percent,
        activity.strategy
    );

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .field
            .as_ref()
            .map(|field| format!("  [{field}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Configuration valid.");
        Ok(())
    } else {
        anyhow::bail!("{} warning(s) found", warnings.len())
    }
}
