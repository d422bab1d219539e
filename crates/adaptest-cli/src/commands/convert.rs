//! The `adaptest convert` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;

use adaptest_core::config::load_config_from;
use adaptest_core::logit::{
    convert_linear_to_logit, convert_logit_to_percent, convert_percent_to_logit,
    map_logit_to_scale,
};

/// Supported conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Conversion {
    /// Percent offset from the midpoint (0..=0.5) to logit
    PercentToLogit,
    /// Non-negative logit to percent offset from the midpoint
    LogitToPercent,
    /// Difficulty level to logit, using the configured range
    LevelToLogit,
    /// Logit to difficulty level, using the configured range
    LogitToLevel,
}

pub fn execute(conversion: Conversion, value: f64, config_path: Option<PathBuf>) -> Result<()> {
    let converted = match conversion {
        Conversion::PercentToLogit => convert_percent_to_logit(value)?,
        Conversion::LogitToPercent => convert_logit_to_percent(value)?,
        Conversion::LevelToLogit | Conversion::LogitToLevel => {
            let config = load_config_from(config_path.as_deref())?;
            let range = config.activity.range()?;
            if conversion == Conversion::LevelToLogit {
                anyhow::ensure!(
                    value.fract() == 0.0,
                    "level must be a whole number, got {value}"
                );
                convert_linear_to_logit(value as i64, &range)
            } else {
                map_logit_to_scale(value, &range)
            }
        }
    };

    println!("{converted:.4}");
    Ok(())
}
