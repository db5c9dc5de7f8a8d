//! TaskRegistry - task_id からオーケストレーターを引く
//!
//! マップの RwLock は検索と登録の間だけ保持し、遷移そのものは
//! 各タスクの LifecycleOrchestrator のロックで直列化します。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::builder::LifecycleServices;
use super::lifecycle::{TransitionContext, TransitionOutcome};
use super::orchestrator::LifecycleOrchestrator;
use super::status::StateCounts;
use crate::domain::{
    Decision, PolicyDocument, PolicyError, Proposal, TaskId, TaskSnapshot, TaskState,
    TransitionError, TransitionRecord,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub struct TaskRegistry {
    services: LifecycleServices,
    tasks: RwLock<HashMap<TaskId, Arc<LifecycleOrchestrator>>>,
}

impl TaskRegistry {
    pub fn new(services: LifecycleServices) -> Self {
        Self {
            services,
            tasks: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_task(&self) -> TaskId {
        let orchestrator = LifecycleOrchestrator::start(self.services.clone()).await;
        let task_id = orchestrator.task_id();
        self.tasks
            .write()
            .await
            .insert(task_id, Arc::new(orchestrator));
        task_id
    }

    pub async fn get(&self, task_id: TaskId) -> Result<Arc<LifecycleOrchestrator>, RegistryError> {
        self.tasks
            .read()
            .await
            .get(&task_id)
            .cloned()
            .ok_or(RegistryError::TaskNotFound(task_id))
    }

    pub async fn request_transition(
        &self,
        task_id: TaskId,
        target: TaskState,
        context: impl Into<TransitionContext>,
    ) -> Result<TransitionOutcome, RegistryError> {
        let orchestrator = self.get(task_id).await?;
        Ok(orchestrator.request_transition(target, context).await?)
    }

    pub async fn history(&self, task_id: TaskId) -> Result<Vec<TransitionRecord>, RegistryError> {
        Ok(self.get(task_id).await?.history().await)
    }

    pub async fn snapshot(&self, task_id: TaskId) -> Result<TaskSnapshot, RegistryError> {
        Ok(self.get(task_id).await?.snapshot().await)
    }

    /// Task ids sorted by id. ULIDs order by creation time at millisecond
    /// resolution; ids from the same millisecond compare by their random part.
    pub async fn task_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.tasks.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    pub async fn counts_by_state(&self) -> StateCounts {
        let orchestrators: Vec<_> = self.tasks.read().await.values().cloned().collect();
        let mut counts = StateCounts::default();
        for orchestrator in orchestrators {
            counts.record(orchestrator.state().await);
        }
        counts
    }

    /// Pure evaluation against the current policy; no task is involved.
    pub async fn evaluate(&self, proposal: &Proposal) -> Decision {
        let policy = self.services.policy.current().await;
        self.services.evaluator.evaluate(proposal, &policy)
    }

    pub async fn policy(&self) -> Arc<PolicyDocument> {
        self.services.policy.current().await
    }

    pub async fn replace_policy(&self, policy: PolicyDocument) -> Result<(), PolicyError> {
        self.services.policy.replace(policy).await
    }
}
