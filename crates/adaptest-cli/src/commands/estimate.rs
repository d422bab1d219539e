//! The `adaptest estimate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::config::load_config_from;
use adaptest_core::measure::{estimate_measure, estimate_standard_error, AbilityReport};

pub fn execute(
    difficulty_sum: f64,
    attempted: u32,
    correct: u32,
    incorrect: u32,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let answered = u64::from(correct) + u64::from(incorrect);
    anyhow::ensure!(
        answered <= u64::from(attempted),
        "correct + incorrect ({answered}) exceeds questions attempted ({attempted})"
    );

    let config = load_config_from(config_path.as_deref())?;
    let range = config.activity.range()?;

    let measure = estimate_measure(difficulty_sum, attempted, correct, incorrect)?;
    let standard_error = estimate_standard_error(attempted, correct, incorrect)?;
    let report = AbilityReport::new(measure, standard_error, &range);

    println!("Measure:        {:.4}", report.measure);
    println!("Standard error: {:.5}", report.standard_error);
    println!(
        "On scale:       {:.1} (± {:.1}%) in {}..={}",
        report.measure_on_scale,
        report.standard_error_percent,
        range.low(),
        range.high()
    );

    Ok(())
}
