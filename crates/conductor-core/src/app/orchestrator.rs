//! LifecycleOrchestrator - 1 タスクの状態と履歴を所有する
//!
//! タスクは `tokio::sync::Mutex` の中にだけ存在し、遷移はロックを取ったまま
//! 「検査 → ポリシー評価 → 追記」まで進みます。同じタスクへの並行リクエストは
//! 直列化され、後から来た方は更新後の状態を見ます。ロックはタスクごとなので、
//! 別のタスクは互いに待ちません。

use tokio::sync::Mutex;

use super::builder::LifecycleServices;
use super::lifecycle::{TransitionContext, TransitionOutcome, plan_transition};
use crate::domain::{
    Decision, DomainEvent, Proposal, Task, TaskId, TaskSnapshot, TaskState, TransitionError,
    TransitionRecord,
};

pub struct LifecycleOrchestrator {
    task_id: TaskId,
    task: Mutex<Task>,
    services: LifecycleServices,
}

impl LifecycleOrchestrator {
    /// Create a new task in `Received` and emit `TaskCreated`.
    pub async fn start(services: LifecycleServices) -> Self {
        let task_id = services.id_generator.generate_task_id();
        let created_at = services.clock.now();
        let orchestrator = Self {
            task_id,
            task: Mutex::new(Task::new(task_id, created_at)),
            services,
        };
        orchestrator
            .services
            .event_sink
            .emit(DomainEvent::TaskCreated {
                task_id,
                at: created_at,
            })
            .await;
        orchestrator
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub async fn state(&self) -> TaskState {
        self.task.lock().await.state()
    }

    /// Request `target` for this task.
    ///
    /// On `Validated -> Approved | Failed` the target is chosen by policy
    /// evaluation, not by the caller. Failures leave the task untouched.
    pub async fn request_transition(
        &self,
        target: TaskState,
        context: impl Into<TransitionContext>,
    ) -> Result<TransitionOutcome, TransitionError> {
        let context = context.into();
        let mut task = self.task.lock().await;
        let policy = self.services.policy.current().await;
        let at = self.services.clock.now();

        let planned = match plan_transition(
            &task,
            target,
            &context,
            &policy,
            self.services.evaluator.as_ref(),
            at,
        ) {
            Ok(planned) => planned,
            Err(err) => {
                self.services
                    .event_sink
                    .emit(DomainEvent::rejected(self.task_id, &err, at))
                    .await;
                return Err(err);
            }
        };

        let state = task.apply(planned.record.clone());
        let history = task.history().to_vec();

        // Emitted under the task lock so per-task event order matches history.
        self.services
            .event_sink
            .emit(DomainEvent::TransitionApplied {
                task_id: self.task_id,
                record: planned.record,
                decision: planned.decision.clone(),
            })
            .await;

        Ok(TransitionOutcome {
            state,
            history,
            decision: planned.decision,
        })
    }

    /// Submit a proposal from `Validated`. Shorthand for requesting `Approved`
    /// with the proposal; the verdict may still land the task in `Failed`.
    pub async fn submit_proposal(
        &self,
        proposal: Proposal,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.request_transition(TaskState::Approved, proposal).await
    }

    /// Copy of the history; later transitions do not show up in it.
    pub async fn history(&self) -> Vec<TransitionRecord> {
        self.task.lock().await.history().to_vec()
    }

    pub async fn snapshot(&self) -> TaskSnapshot {
        self.task.lock().await.snapshot()
    }

    /// Evaluate without transitioning (dry run against the current policy).
    pub async fn preview(&self, proposal: &Proposal) -> Decision {
        let policy = self.services.policy.current().await;
        self.services.evaluator.evaluate(proposal, &policy)
    }
}
