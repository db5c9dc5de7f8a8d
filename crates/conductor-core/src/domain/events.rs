//! Events - ドメインイベント
//!
//! オーケストレーターが発行する監査用イベント。EventSink に送られ、
//! ログ出力や外部の監査ストアへの保存は sink 側の責務です。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::errors::TransitionError;
use super::ids::TaskId;
use super::state::TaskState;
use super::transition::TransitionRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    TaskCreated {
        task_id: TaskId,
        at: DateTime<Utc>,
    },

    /// A record was appended. `decision` is present for the policy-gated edge.
    TransitionApplied {
        task_id: TaskId,
        record: TransitionRecord,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decision: Option<Decision>,
    },

    /// A request was refused; the task did not change.
    TransitionRejected {
        task_id: TaskId,
        from: TaskState,
        attempted: TaskState,
        error: String,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn rejected(task_id: TaskId, error: &TransitionError, at: DateTime<Utc>) -> Self {
        DomainEvent::TransitionRejected {
            task_id,
            from: error.from_state(),
            attempted: error.attempted(),
            error: error.to_string(),
            at,
        }
    }

    pub fn task_id(&self) -> TaskId {
        match self {
            DomainEvent::TaskCreated { task_id, .. }
            | DomainEvent::TransitionApplied { task_id, .. }
            | DomainEvent::TransitionRejected { task_id, .. } => *task_id,
        }
    }
}
