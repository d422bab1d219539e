//! adaptest CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::convert::Conversion;
use commands::next::LastAnswer;

#[derive(Parser)]
#[command(
    name = "adaptest",
    version,
    about = "Computerized adaptive testing engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Determine the difficulty level of the next question
    Next {
        /// Level of the question just answered
        #[arg(long)]
        level: i64,

        /// Questions attempted so far, including the last one
        #[arg(long)]
        attempted: u32,

        /// Number of correct answers so far
        #[arg(long)]
        correct: u32,

        /// Number of incorrect answers so far
        #[arg(long)]
        incorrect: u32,

        /// Outcome of the last question
        #[arg(long, value_enum)]
        last: LastAnswer,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert between percents, logits and difficulty levels
    Convert {
        /// Conversion to perform
        #[arg(value_enum)]
        conversion: Conversion,

        /// Value to convert
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Estimate ability measure and standard error
    Estimate {
        /// Sum of the logit difficulties of answered questions
        #[arg(long, allow_negative_numbers = true)]
        difficulty_sum: f64,

        /// Questions attempted
        #[arg(long)]
        attempted: u32,

        /// Number of correct answers
        #[arg(long)]
        correct: u32,

        /// Number of incorrect answers
        #[arg(long)]
        incorrect: u32,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Simulate an adaptive attempt
    Simulate {
        /// Taker ability on the logit scale
        #[arg(long, allow_negative_numbers = true, conflicts_with = "pattern")]
        ability: Option<f64>,

        /// Scripted answers, e.g. "CCIC" (C = correct, I = incorrect)
        #[arg(long)]
        pattern: Option<String>,

        /// Write the simulation report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate the activity configuration
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Next {
            level,
            attempted,
            correct,
            incorrect,
            last,
            format,
            config,
        } => commands::next::execute(level, attempted, correct, incorrect, last, format, config),
        Commands::Convert {
            conversion,
            value,
            config,
        } => commands::convert::execute(conversion, value, config),
        Commands::Estimate {
            difficulty_sum,
            attempted,
            correct,
            incorrect,
            config,
        } => commands::estimate::execute(difficulty_sum, attempted, correct, incorrect, config),
        Commands::Simulate {
            ability,
            pattern,
            output,
            config,
        } => commands::simulate::execute(ability, pattern, output, config),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
