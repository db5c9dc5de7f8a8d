//! Decision model: the outcome of a policy evaluation.
//!
//! A `Reject` is a normal value, not an error. The orchestrator turns it into
//! a successful transition to `Failed`.

use serde::{Deserialize, Serialize};

use super::errors::DecisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approve,
    Reject,
}

/// One broken rule, e.g. `{rule: "cost", detail: "30 exceeds max 25"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub detail: String,
}

impl Violation {
    pub fn new(rule: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            detail: detail.into(),
        }
    }
}

/// Verdict plus the ordered list of violations that produced it.
///
/// Invariant: `verdict == Approve` iff `violations` is empty.
/// [`Decision::from_violations`] is the only constructor; deserialization
/// refuses documents that break the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisionWire")]
pub struct Decision {
    verdict: Verdict,
    violations: Vec<Violation>,
}

#[derive(Deserialize)]
struct DecisionWire {
    verdict: Verdict,
    #[serde(default)]
    violations: Vec<Violation>,
}

impl TryFrom<DecisionWire> for Decision {
    type Error = DecisionError;

    fn try_from(wire: DecisionWire) -> Result<Self, Self::Error> {
        let decision = Decision::from_violations(wire.violations);
        if decision.verdict != wire.verdict {
            return Err(DecisionError::VerdictMismatch {
                verdict: wire.verdict,
                violations: decision.violations.len(),
            });
        }
        Ok(decision)
    }
}

impl Decision {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let verdict = if violations.is_empty() {
            Verdict::Approve
        } else {
            Verdict::Reject
        };
        Self {
            verdict,
            violations,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_approved(&self) -> bool {
        self.verdict == Verdict::Approve
    }

    /// Violations rendered as `"rule: detail; rule: detail"`, or `None` if approved.
    pub fn reason(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }
        let joined = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.rule, v.detail))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_violations_approve() {
        let d = Decision::from_violations(vec![]);
        assert_eq!(d.verdict(), Verdict::Approve);
        assert!(d.is_approved());
        assert_eq!(d.reason(), None);
    }

    #[test]
    fn any_violation_rejects_and_joins_reason() {
        let d = Decision::from_violations(vec![
            Violation::new("risk", "high exceeds max medium"),
            Violation::new("cost", "30 exceeds max 25"),
        ]);
        assert_eq!(d.verdict(), Verdict::Reject);
        assert_eq!(
            d.reason().as_deref(),
            Some("risk: high exceeds max medium; cost: 30 exceeds max 25")
        );
    }

    #[test]
    fn deserializes_consistent_documents() {
        let d: Decision = serde_json::from_str(r#"{"verdict":"APPROVE"}"#).unwrap();
        assert!(d.is_approved());

        let json = r#"{"verdict":"REJECT","violations":[{"rule":"cost","detail":"30 exceeds max 25"}]}"#;
        let d: Decision = serde_json::from_str(json).unwrap();
        assert_eq!(d.reason().as_deref(), Some("cost: 30 exceeds max 25"));
    }

    #[test]
    fn approve_with_violations_is_refused() {
        let json = r#"{"verdict":"APPROVE","violations":[{"rule":"risk","detail":"x"}]}"#;
        let err = serde_json::from_str::<Decision>(json).unwrap_err();
        assert!(err.to_string().contains("1 violation"), "{err}");
    }

    #[test]
    fn reject_without_violations_is_refused() {
        let json = r#"{"verdict":"REJECT","violations":[]}"#;
        assert!(serde_json::from_str::<Decision>(json).is_err());
    }

    #[test]
    fn serializes_verdict_upper_case() {
        let d = Decision::from_violations(vec![Violation::new("cost", "x")]);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["verdict"], "REJECT");
        assert_eq!(v["violations"][0]["rule"], "cost");
    }
}
