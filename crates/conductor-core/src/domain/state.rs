//! Task lifecycle states and the transition table.
//!
//! The table lives in [`TaskState::successors`]: every legality check,
//! terminal check and policy-gate check is derived from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// TaskState はタスクのライフサイクル上の位置を表現
///
/// # 状態遷移
/// - Received -> Classified -> Proposed -> Validated
/// - Validated -> Approved | Failed（ポリシー評価で決定）
/// - Approved -> Executing -> Completed | RolledBack | Failed
///
/// Completed / RolledBack / Failed は終端（遷移先なし）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Received,
    Classified,
    Proposed,
    Validated,
    Approved,
    Executing,
    Completed,
    RolledBack,
    Failed,
}

use TaskState::*;

const FROM_RECEIVED: &[TaskState] = &[Classified];
const FROM_CLASSIFIED: &[TaskState] = &[Proposed];
const FROM_PROPOSED: &[TaskState] = &[Validated];
const FROM_VALIDATED: &[TaskState] = &[Approved, Failed];
const FROM_APPROVED: &[TaskState] = &[Executing];
const FROM_EXECUTING: &[TaskState] = &[Completed, RolledBack, Failed];
const TERMINAL: &[TaskState] = &[];

impl TaskState {
    /// All states in lifecycle order.
    pub const ALL: [TaskState; 9] = [
        Received, Classified, Proposed, Validated, Approved, Executing, Completed, RolledBack,
        Failed,
    ];

    /// The only state a task can be created in.
    pub const INITIAL: TaskState = Received;

    /// Legal successor states (adjacency list of the lifecycle graph).
    pub fn successors(self) -> &'static [TaskState] {
        match self {
            Received => FROM_RECEIVED,
            Classified => FROM_CLASSIFIED,
            Proposed => FROM_PROPOSED,
            Validated => FROM_VALIDATED,
            Approved => FROM_APPROVED,
            Executing => FROM_EXECUTING,
            Completed | RolledBack | Failed => TERMINAL,
        }
    }

    pub fn can_transition_to(self, target: TaskState) -> bool {
        self.successors().contains(&target)
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Is `self -> target` the edge whose target is chosen by policy evaluation?
    ///
    /// Only legal edges out of `Validated` qualify.
    pub fn is_policy_gated(self, target: TaskState) -> bool {
        self == Validated && self.can_transition_to(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Received => "RECEIVED",
            Classified => "CLASSIFIED",
            Proposed => "PROPOSED",
            Validated => "VALIDATED",
            Approved => "APPROVED",
            Executing => "EXECUTING",
            Completed => "COMPLETED",
            RolledBack => "ROLLED_BACK",
            Failed => "FAILED",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task state '{0}'")]
pub struct ParseStateError(pub String);

impl FromStr for TaskState {
    type Err = ParseStateError;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable
    /// (`rolled-back`, `ROLLED_BACK`, `RolledBack` all parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_uppercase)
            .collect();
        TaskState::ALL
            .into_iter()
            .find(|state| state.as_str().replace('_', "") == normalized)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn terminal_states_have_no_successors() {
        let terminal: Vec<_> = TaskState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![Completed, RolledBack, Failed]);
    }

    #[test]
    fn self_loops_are_absent() {
        for state in TaskState::ALL {
            assert!(!state.can_transition_to(state), "{state} -> {state}");
        }
    }

    #[test]
    fn every_non_initial_state_is_reachable() {
        for state in TaskState::ALL {
            if state == TaskState::INITIAL {
                continue;
            }
            let reachable = TaskState::ALL
                .into_iter()
                .any(|from| from.can_transition_to(state));
            assert!(reachable, "{state} has no predecessor");
        }
        assert!(
            !TaskState::ALL
                .into_iter()
                .any(|from| from.can_transition_to(TaskState::INITIAL))
        );
    }

    #[rstest]
    #[case::approve(Validated, Approved, true)]
    #[case::fail(Validated, Failed, true)]
    #[case::validated_to_executing(Validated, Executing, false)]
    #[case::executing_to_failed(Executing, Failed, false)]
    #[case::proposed_to_validated(Proposed, Validated, false)]
    fn policy_gate_covers_only_validated_edges(
        #[case] from: TaskState,
        #[case] to: TaskState,
        #[case] gated: bool,
    ) {
        assert_eq!(from.is_policy_gated(to), gated);
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let s = serde_json::to_string(&RolledBack).unwrap();
        assert_eq!(s, "\"ROLLED_BACK\"");
        let back: TaskState = serde_json::from_str("\"EXECUTING\"").unwrap();
        assert_eq!(back, Executing);
    }

    #[rstest]
    #[case("ROLLED_BACK", RolledBack)]
    #[case("rolled-back", RolledBack)]
    #[case("RolledBack", RolledBack)]
    #[case("completed", Completed)]
    #[case("Validated", Validated)]
    fn parses_loose_names(#[case] input: &str, #[case] expected: TaskState) {
        assert_eq!(input.parse::<TaskState>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("paused".parse::<TaskState>().is_err());
    }
}
