//! The `adaptest simulate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::administration::AdministrationRegistry;
use adaptest_core::config::{load_config_from, validate_config};
use adaptest_core::simulation::{
    AbilityResponder, Responder, ScriptedResponder, SimulationReport, Simulator,
};

pub fn execute(
    ability: Option<f64>,
    pattern: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    for warning in validate_config(&config) {
        tracing::warn!("config: {}", warning.message);
    }
    let activity = &config.activity;

    let responder: Box<dyn Responder> = match (ability, pattern) {
        (Some(ability), _) => Box::new(AbilityResponder { ability }),
        (None, Some(pattern)) => Box::new(ScriptedResponder::parse(&pattern)?),
        (None, None) => anyhow::bail!("either --ability or --pattern is required"),
    };

    let administration = AdministrationRegistry::with_defaults().create_for(activity)?;
    eprintln!(
        "adaptest v{} — Simulating attempt with strategy '{}' (levels {}..={}, max {} questions)",
        env!("CARGO_PKG_VERSION"),
        administration.strategy(),
        activity.lowest_level,
        activity.highest_level,
        activity.max_questions
    );

    let report =
        Simulator::default().run(administration.as_ref(), responder.as_ref(), activity, 1)?;

    print_steps(&report);

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_steps(report: &SimulationReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Level",
        "Answer",
        "Next level",
        "Measure",
        "Std error",
    ]);

    for step in &report.steps {
        table.add_row(vec![
            Cell::new(step.question),
            Cell::new(step.level),
            Cell::new(if step.correct { "correct" } else { "incorrect" }),
            Cell::new(step.next_level),
            Cell::new(format!("{:.4}", step.measure)),
            Cell::new(format!("{:.4}", step.standard_error)),
        ]);
    }

    println!("{table}");
    println!(
        "Stopped: {} after {} question(s)",
        report.stop,
        report.steps.len()
    );
    println!(
        "Ability: {:.1} on scale (measure {:.4}, ± {:.1}%)",
        report.ability.measure_on_scale,
        report.ability.measure,
        report.ability.standard_error_percent
    );
}
