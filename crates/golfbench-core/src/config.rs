//! Harness configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, a TOML file,
//! `GOLFBENCH_*` environment variables, CLI flags (applied by the binary).
//!
//! ```toml
//! max_steps_per_run = 1000000   # 0 disables the bound
//! max_stack_depth = 1024
//! max_value_bits = 4096
//! leaderboard_size = 10
//! oracle_cache_capacity = 64    # omit for an unbounded cache
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::vm::VmLimits;

pub const ENV_MAX_STEPS: &str = "GOLFBENCH_MAX_STEPS";
pub const ENV_MAX_STACK: &str = "GOLFBENCH_MAX_STACK";
pub const ENV_MAX_VALUE_BITS: &str = "GOLFBENCH_MAX_VALUE_BITS";
pub const ENV_LEADERBOARD_SIZE: &str = "GOLFBENCH_LEADERBOARD_SIZE";
pub const ENV_ORACLE_CACHE: &str = "GOLFBENCH_ORACLE_CACHE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("{0}")]
    Invalid(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables for a harness instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Instruction ceiling per VM run; `None` (or `0` in files and env)
    /// disables the bound.
    #[serde(deserialize_with = "zero_as_none")]
    pub max_steps_per_run: Option<u64>,

    /// Operand-stack ceiling per VM run.
    pub max_stack_depth: usize,

    /// Size ceiling, in bits, for any value a VM run produces.
    pub max_value_bits: u64,

    /// Number of records shown by the leaderboard.
    pub leaderboard_size: usize,

    /// Oracle cache entry cap; `None` keeps every computed value.
    pub oracle_cache_capacity: Option<usize>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let limits = VmLimits::default();
        Self {
            max_steps_per_run: limits.max_steps,
            max_stack_depth: limits.max_stack_depth,
            max_value_bits: limits.max_value_bits,
            leaderboard_size: 10,
            oracle_cache_capacity: None,
        }
    }
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.filter(|&steps| steps > 0))
}

impl HarnessConfig {
    /// Defaults overridden by `GOLFBENCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from a key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_STEPS) {
            self.max_steps_per_run = parse_step_limit(&raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_STACK) {
            self.max_stack_depth = parse_number(ENV_MAX_STACK, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_VALUE_BITS) {
            self.max_value_bits = parse_number(ENV_MAX_VALUE_BITS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LEADERBOARD_SIZE) {
            self.leaderboard_size = parse_number(ENV_LEADERBOARD_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ORACLE_CACHE) {
            self.oracle_cache_capacity = match raw.trim() {
                "" | "unbounded" => None,
                other => Some(parse_number(ENV_ORACLE_CACHE, other)?),
            };
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stack_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_stack_depth must be at least 1".to_string(),
            ));
        }
        if self.max_value_bits == 0 {
            return Err(ConfigError::Invalid(
                "max_value_bits must be at least 1".to_string(),
            ));
        }
        if self.leaderboard_size == 0 {
            return Err(ConfigError::Invalid(
                "leaderboard_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn vm_limits(&self) -> VmLimits {
        VmLimits {
            max_steps: self.max_steps_per_run,
            max_stack_depth: self.max_stack_depth,
            max_value_bits: self.max_value_bits,
        }
    }
}

/// `0`, `none` and `unlimited` disable the step bound.
pub fn parse_step_limit(raw: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("unlimited") {
        return Ok(None);
    }
    let steps: u64 = parse_number(ENV_MAX_STEPS, trimmed)?;
    Ok((steps > 0).then_some(steps))
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
