//! Default policy evaluator: risk ceiling + cost ceiling.

use crate::domain::{Decision, PolicyDocument, Proposal, Violation};
use crate::ports::Evaluator;

/// Checks a proposal against `risk.max_level` and `cost.max_usd`.
///
/// - Risk: ordinal scale `low < medium < high`, the maximum itself is accepted.
/// - Cost: `cost_usd <= max_usd`, compared as-is (no rounding).
/// - Violations are listed risk first, then cost.
///
/// `cost.hard_fail` is not consulted: every violation rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for PolicyEvaluator {
    fn evaluate(&self, proposal: &Proposal, policy: &PolicyDocument) -> Decision {
        let mut violations = Vec::new();

        let max_level = policy.risk.max_level;
        if proposal.risk_level() > max_level {
            violations.push(Violation::new(
                "risk",
                format!("{} exceeds max {}", proposal.risk_level(), max_level),
            ));
        }

        let max_usd = policy.cost.max_usd;
        if proposal.cost_usd() > max_usd {
            violations.push(Violation::new(
                "cost",
                format!("{} exceeds max {}", proposal.cost_usd(), max_usd),
            ));
        }

        let decision = Decision::from_violations(violations);
        tracing::debug!(
            risk = %proposal.risk_level(),
            cost_usd = proposal.cost_usd(),
            verdict = ?decision.verdict(),
            violations = decision.violations().len(),
            "policy evaluated"
        );
        decision
    }
}
