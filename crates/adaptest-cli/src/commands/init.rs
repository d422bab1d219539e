//! The `adaptest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit adaptest.toml with your activity's difficulty range");
    println!("  2. Run: adaptest validate");
    println!("  3. Run: adaptest simulate --ability 0.5");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

[activity]
# Difficulty scale of the question bank
lowest_level = 1
highest_level = 100
# Level of the first question
starting_level = 50
# Attempt length
min_questions = 5
max_questions = 20
# Stop once the standard error falls below this percent of the scale
standard_error_percent = 5.0
# Read marks as fractions of the maximum mark
return_fraction = true
strategy = "catalgo"
"#;
