//! Activity configuration loading and validation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::algo::CatAlgoConfig;
use crate::error::CatResult;
use crate::range::DifficultyRange;
use crate::stopping::StoppingCriteria;

/// Settings of one adaptive activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Lowest difficulty level of the scale.
    #[serde(default = "default_lowest_level")]
    pub lowest_level: i64,
    /// Highest difficulty level of the scale.
    #[serde(default = "default_highest_level")]
    pub highest_level: i64,
    /// Level of the first question.
    #[serde(default = "default_starting_level")]
    pub starting_level: i64,
    /// Minimum questions before the standard-error stop may apply.
    #[serde(default = "default_min_questions")]
    pub min_questions: u32,
    /// Maximum questions per attempt.
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
    /// Target standard error, in percent of the scale.
    #[serde(default = "default_standard_error_percent")]
    pub standard_error_percent: f64,
    /// Read marks as fractions of the maximum mark.
    #[serde(default = "default_true")]
    pub return_fraction: bool,
    /// Item administration strategy key.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_lowest_level() -> i64 {
    1
}
fn default_highest_level() -> i64 {
    100
}
fn default_starting_level() -> i64 {
    50
}
fn default_min_questions() -> u32 {
    1
}
fn default_max_questions() -> u32 {
    20
}
fn default_standard_error_percent() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}
fn default_strategy() -> String {
    crate::administration::CATALGO_STRATEGY.to_string()
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            lowest_level: default_lowest_level(),
            highest_level: default_highest_level(),
            starting_level: default_starting_level(),
            min_questions: default_min_questions(),
            max_questions: default_max_questions(),
            standard_error_percent: default_standard_error_percent(),
            return_fraction: true,
            strategy: default_strategy(),
        }
    }
}

impl ActivityConfig {
    pub fn range(&self) -> CatResult<DifficultyRange> {
        DifficultyRange::new(self.lowest_level, self.highest_level)
    }

    pub fn criteria(&self) -> StoppingCriteria {
        StoppingCriteria {
            min_questions: self.min_questions,
            max_questions: self.max_questions,
            standard_error_percent: self.standard_error_percent,
        }
    }

    pub fn algo_config(&self) -> CatAlgoConfig {
        CatAlgoConfig {
            return_fraction: self.return_fraction,
            default_level: Some(self.starting_level),
        }
    }
}

/// Top-level adaptest configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptestConfig {
    #[serde(default)]
    pub activity: ActivityConfig,
}

/// Parse a TOML string into a config (useful for testing).
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<AdaptestConfig> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// `ADAPTEST_STRATEGY` overrides the item administration strategy.
pub fn load_config() -> Result<AdaptestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("adaptest.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content, &path)?
        }
        None => AdaptestConfig::default(),
    };

    if let Ok(strategy) = std::env::var("ADAPTEST_STRATEGY") {
        tracing::debug!(%strategy, "strategy overridden from environment");
        config.activity.strategy = strategy;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}

/// A problem found while validating a config.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending setting, if the warning is about one field.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

/// Check an activity config for settings the algorithm cannot work with.
pub fn validate_config(config: &AdaptestConfig) -> Vec<ValidationWarning> {
    let activity = &config.activity;
    let mut warnings = Vec::new();

    if activity.lowest_level >= activity.highest_level {
        warnings.push(ValidationWarning::field(
            "lowest_level",
            format!(
                "lowest level {} must be less than highest level {}",
                activity.lowest_level, activity.highest_level
            ),
        ));
    } else if !(activity.lowest_level..=activity.highest_level).contains(&activity.starting_level)
    {
        warnings.push(ValidationWarning::field(
            "starting_level",
            format!(
                "starting level {} is outside {}..={}",
                activity.starting_level, activity.lowest_level, activity.highest_level
            ),
        ));
    }

    if activity.max_questions == 0 {
        warnings.push(ValidationWarning::field(
            "max_questions",
            "maximum questions must be at least 1",
        ));
    }
    if activity.min_questions > activity.max_questions {
        warnings.push(ValidationWarning::field(
            "min_questions",
            format!(
                "minimum questions {} exceeds maximum {}",
                activity.min_questions, activity.max_questions
            ),
        ));
    }

    if !(activity.standard_error_percent > 0.0 && activity.standard_error_percent <= 50.0) {
        warnings.push(ValidationWarning::field(
            "standard_error_percent",
            format!(
                "standard error percent {} must be in (0, 50]",
                activity.standard_error_percent
            ),
        ));
    }

    if !crate::administration::AdministrationRegistry::with_defaults().contains(&activity.strategy)
    {
        warnings.push(ValidationWarning::field(
            "strategy",
            format!("unknown strategy '{}'", activity.strategy),
        ));
    }

    warnings
}
