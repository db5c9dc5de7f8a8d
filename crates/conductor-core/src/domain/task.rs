//! Task: identity + current state + history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TaskId;
use super::state::TaskState;
use super::transition::TransitionRecord;

/// A unit of work tracked through the lifecycle.
///
/// Design:
/// - Fields are private; the only mutation is [`Task::apply`], which is
///   crate-private and called by the orchestrator after a transition has
///   been planned and checked.
/// - `history` is append-only.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    state: TaskState,
    created_at: DateTime<Utc>,
    history: Vec<TransitionRecord>,
}

impl Task {
    pub fn new(id: TaskId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            state: TaskState::INITIAL,
            created_at,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Append an accepted record and move to its target.
    ///
    /// Caller guarantees `record.from == self.state` and that the edge is legal.
    pub(crate) fn apply(&mut self, record: TransitionRecord) -> TaskState {
        debug_assert_eq!(record.from, self.state);
        debug_assert!(record.from.can_transition_to(record.to));
        self.state = record.to;
        self.history.push(record);
        self.state
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            task_id: self.id,
            state: self.state,
            created_at: self.created_at,
            history: self.history.clone(),
        }
    }
}

/// Serializable copy of a task, for API responses and audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_id: TaskId,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    pub history: Vec<TransitionRecord>,
}
