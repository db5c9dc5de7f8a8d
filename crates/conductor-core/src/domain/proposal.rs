//! Proposal submitted for policy review once a task is `Validated`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ProposalError;

/// Ordinal risk scale: `Low < Medium < High`.
///
/// The derived `Ord` is the comparison the evaluator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(ProposalError::UnknownRiskLevel(s.to_string())),
        }
    }
}

/// Risk/cost summary of the work a task wants to run.
///
/// `cost_usd` is always finite and non-negative; both constructors and
/// deserialization enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProposalWire")]
pub struct Proposal {
    risk_level: RiskLevel,
    cost_usd: f64,
}

impl Proposal {
    pub fn new(risk_level: RiskLevel, cost_usd: f64) -> Result<Self, ProposalError> {
        if !cost_usd.is_finite() {
            return Err(ProposalError::NonFiniteCost);
        }
        if cost_usd < 0.0 {
            return Err(ProposalError::NegativeCost(cost_usd));
        }
        Ok(Self {
            risk_level,
            cost_usd,
        })
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn cost_usd(&self) -> f64 {
        self.cost_usd
    }
}

/// On-the-wire shape. Accepts the `proposal.json` form
/// (`{"risk": "low", "costUsd": 10}`) as well as snake_case names.
#[derive(Deserialize)]
struct ProposalWire {
    #[serde(alias = "risk", alias = "riskLevel")]
    risk_level: RiskLevel,
    #[serde(alias = "costUsd")]
    cost_usd: f64,
}

impl TryFrom<ProposalWire> for Proposal {
    type Error = ProposalError;

    fn try_from(wire: ProposalWire) -> Result<Self, Self::Error> {
        Proposal::new(wire.risk_level, wire.cost_usd)
    }
}
