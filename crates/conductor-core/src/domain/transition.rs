//! Transition records: the audit trail of a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::TaskState;

/// One accepted state change.
///
/// Records are appended to a task's history and never edited or removed.
/// `reason` is set only when a policy rejection drove the task to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: TaskState,
    pub to: TaskState,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TransitionRecord {
    pub fn new(from: TaskState, to: TaskState, at: DateTime<Utc>, reason: Option<String>) -> Self {
        Self {
            from,
            to,
            at,
            reason,
        }
    }
}

/// Check the history fidelity invariant: the records form a gapless chain
/// starting at `Received` and ending at `current`.
pub fn is_consistent_history(history: &[TransitionRecord], current: TaskState) -> bool {
    let mut expected_from = TaskState::INITIAL;
    for record in history {
        if record.from != expected_from || !record.from.can_transition_to(record.to) {
            return false;
        }
        expected_from = record.to;
    }
    expected_from == current
}
