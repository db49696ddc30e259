use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ProjectionError;

/// Configuration for the projection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How out-of-range (but finite) inputs are treated
    pub range_policy: RangePolicy,

    /// Decimal places kept on the projection
    pub projection_decimals: u32,

    /// Decimal places kept on the over probability
    pub probability_decimals: u32,
}

/// Domain-range validation applied before projecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Only finite fields and a non-negative line are required. Everything
    /// else flows through the raw arithmetic.
    #[default]
    PassThrough,

    /// Also reject negative routes, rates outside [0, 1] and a negative
    /// matchup factor.
    Strict,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::PassThrough,
            projection_decimals: 2,
            probability_decimals: 3,
        }
    }
}

impl FromStr for RangePolicy {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "pass-through" | "pass_through" => Ok(RangePolicy::PassThrough),
            "strict" => Ok(RangePolicy::Strict),
            other => Err(ProjectionError::InvalidInput(format!(
                "unknown range policy '{}', expected 'passthrough' or 'strict'",
                other
            ))),
        }
    }
}

impl EngineConfig {
    /// Strict range checks with default rounding
    pub fn strict() -> Self {
        Self { range_policy: RangePolicy::Strict, ..Self::default() }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var("PROJECTION_RANGE_POLICY") {
            config.range_policy = policy.parse()?;
        }

        Ok(config)
    }
}
