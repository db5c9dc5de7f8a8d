//! Policy document: bounds for approval plus deployment/rollback metadata.
//!
//! Only `risk` and `cost` take part in the verdict. `deployment` and
//! `rollback` are carried through for whatever runs the work afterwards.
//!
//! Keys are snake_case; the camelCase names of the JavaScript policy files
//! are accepted as aliases when a document is deserialized directly (e.g.
//! from JSON). Settings sources lowercase their keys, so only the snake_case
//! names reach this type from there. Unknown keys are rejected either way.

use serde::{Deserialize, Serialize};

use super::errors::PolicyError;
use super::proposal::RiskLevel;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default)]
    pub risk: RiskPolicy,
    #[serde(default)]
    pub cost: CostPolicy,
    #[serde(default)]
    pub deployment: DeploymentPolicy,
    #[serde(default)]
    pub rollback: RollbackPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskPolicy {
    /// Highest acceptable risk level (inclusive).
    #[serde(alias = "maxLevel")]
    pub max_level: RiskLevel,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            max_level: RiskLevel::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostPolicy {
    /// Cost ceiling in USD (inclusive).
    #[serde(alias = "maxUsd")]
    pub max_usd: f64,

    /// Read but has no effect: every violation already rejects.
    #[serde(default = "default_hard_fail", alias = "hardFail")]
    pub hard_fail: bool,
}

fn default_hard_fail() -> bool {
    true
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            max_usd: 25.0,
            hard_fail: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentPolicy {
    pub strategy: String,

    /// Share of traffic for the canary stage, 0-100.
    #[serde(alias = "canaryPercent")]
    pub canary_percent: u8,
}

impl Default for DeploymentPolicy {
    fn default() -> Self {
        Self {
            strategy: "canary".to_string(),
            canary_percent: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollbackPolicy {
    #[serde(alias = "errorRatePct", alias = "errorRate")]
    pub error_rate_pct: f64,

    #[serde(alias = "latencyMs")]
    pub latency_ms: u64,
}

impl Default for RollbackPolicy {
    fn default() -> Self {
        Self {
            error_rate_pct: 2.0,
            latency_ms: 250,
        }
    }
}

impl PolicyDocument {
    /// Check the document before it is used for any evaluation.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.cost.max_usd.is_finite() || self.cost.max_usd < 0.0 {
            return Err(PolicyError::InvalidMaxCost(self.cost.max_usd));
        }
        if self.deployment.canary_percent > 100 {
            return Err(PolicyError::CanaryPercentOutOfRange(
                self.deployment.canary_percent,
            ));
        }
        if self.deployment.strategy.trim().is_empty() {
            return Err(PolicyError::EmptyDeploymentStrategy);
        }
        if !self.rollback.error_rate_pct.is_finite() {
            return Err(PolicyError::InvalidErrorRate(self.rollback.error_rate_pct));
        }
        Ok(())
    }

    /// Convenience for tests and callers that only care about the gate.
    pub fn with_limits(max_level: RiskLevel, max_usd: f64) -> Self {
        Self {
            risk: RiskPolicy { max_level },
            cost: CostPolicy {
                max_usd,
                ..CostPolicy::default()
            },
            ..Self::default()
        }
    }
}
