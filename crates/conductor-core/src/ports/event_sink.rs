//! EventSink port - 監査イベントの送り先
//!
//! # 実装
//! - NoopEventSink: 何もしない
//! - TracingEventSink: tracing へ構造化ログとして出力
//! - MemoryEventSink: メモリに蓄積（テストと CLI の監査出力用）

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::DomainEvent;

/// Sinks must not fail the transition that produced the event; delivery
/// problems are the sink's own concern.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: DomainEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _event: DomainEvent) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: DomainEvent) {
        match &event {
            DomainEvent::TaskCreated { task_id, at } => {
                tracing::info!(task_id = %task_id, at = %at, "task created");
            }
            DomainEvent::TransitionApplied {
                task_id,
                record,
                decision,
            } => {
                tracing::info!(
                    task_id = %task_id,
                    from = %record.from,
                    to = %record.to,
                    verdict = ?decision.as_ref().map(|d| d.verdict()),
                    reason = record.reason.as_deref(),
                    "transition applied"
                );
            }
            DomainEvent::TransitionRejected {
                task_id,
                from,
                attempted,
                error,
                ..
            } => {
                tracing::warn!(
                    task_id = %task_id,
                    from = %from,
                    attempted = %attempted,
                    error = %error,
                    "transition rejected"
                );
            }
        }
    }
}

/// Collects every event in emission order.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn emit(&self, event: DomainEvent) {
        self.events.lock().await.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use chrono::Utc;
    use ulid::Ulid;

    #[tokio::test]
    async fn memory_sink_keeps_order() {
        let sink = MemoryEventSink::new();
        let first = TaskId::from_ulid(Ulid::new());
        let second = TaskId::from_ulid(Ulid::new());

        sink.emit(DomainEvent::TaskCreated {
            task_id: first,
            at: Utc::now(),
        })
        .await;
        sink.emit(DomainEvent::TaskCreated {
            task_id: second,
            at: Utc::now(),
        })
        .await;

        let ids: Vec<_> = sink.events().await.iter().map(|e| e.task_id()).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
