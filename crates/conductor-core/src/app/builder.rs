//! OrchestratorBuilder - 依存のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: ポリシー文書は build() で検証し、
//!   評価のたびには検証しない

use std::sync::Arc;

use tokio::sync::RwLock;

use super::evaluator::PolicyEvaluator;
use super::registry::TaskRegistry;
use crate::domain::{PolicyDocument, PolicyError};
use crate::ports::{
    Clock, EventSink, Evaluator, IdGenerator, SystemClock, TracingEventSink, UlidGenerator,
};

/// OrchestratorBuilder は LifecycleServices を構築
///
/// # 使用例
/// ```ignore
/// let registry = OrchestratorBuilder::new()
///     .policy(PolicyDocument::default())
///     .clock(FixedClock::new(at))
///     .build_registry()?;
/// ```
///
/// Unset ports fall back to `PolicyEvaluator`, `SystemClock`,
/// `UlidGenerator<SystemClock>` and `TracingEventSink`.
pub struct OrchestratorBuilder {
    policy: Option<PolicyDocument>,
    evaluator: Option<Arc<dyn Evaluator>>,
    clock: Option<Arc<dyn Clock>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    event_sink: Option<Arc<dyn EventSink>>,
}

/// BuildError はワイヤリング時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no policy document was provided")]
    MissingPolicy,

    #[error("invalid policy document: {0}")]
    InvalidPolicy(#[from] PolicyError),
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            policy: None,
            evaluator: None,
            clock: None,
            id_generator: None,
            event_sink: None,
        }
    }

    pub fn policy(mut self, policy: PolicyDocument) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Some(Arc::new(id_generator));
        self
    }

    /// Takes an `Arc` so the caller can keep a handle (e.g. to a `MemoryEventSink`).
    pub fn event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(event_sink);
        self
    }

    /// # 検証
    /// - policy が未設定なら BuildError::MissingPolicy
    /// - PolicyDocument::validate() に失敗したら BuildError::InvalidPolicy
    pub fn build(self) -> Result<LifecycleServices, BuildError> {
        let policy = self.policy.ok_or(BuildError::MissingPolicy)?;
        policy.validate()?;

        let evaluator: Arc<dyn Evaluator> = match self.evaluator {
            Some(evaluator) => evaluator,
            None => Arc::new(PolicyEvaluator::new()),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let id_generator: Arc<dyn IdGenerator> = match self.id_generator {
            Some(id_generator) => id_generator,
            None => Arc::new(UlidGenerator::new(SystemClock)),
        };
        let event_sink: Arc<dyn EventSink> = match self.event_sink {
            Some(event_sink) => event_sink,
            None => Arc::new(TracingEventSink),
        };

        Ok(LifecycleServices {
            policy: SharedPolicy::new(policy),
            evaluator,
            clock,
            id_generator,
            event_sink,
        })
    }

    pub fn build_registry(self) -> Result<TaskRegistry, BuildError> {
        Ok(TaskRegistry::new(self.build()?))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Policy document shared by every orchestrator built from the same services.
///
/// Replacement swaps the whole `Arc`; a transition in progress keeps using the
/// snapshot it read when it started.
#[derive(Clone)]
pub struct SharedPolicy {
    inner: Arc<RwLock<Arc<PolicyDocument>>>,
}

impl SharedPolicy {
    pub fn new(policy: PolicyDocument) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(policy))),
        }
    }

    pub async fn current(&self) -> Arc<PolicyDocument> {
        Arc::clone(&*self.inner.read().await)
    }

    pub async fn replace(&self, policy: PolicyDocument) -> Result<(), PolicyError> {
        policy.validate()?;
        *self.inner.write().await = Arc::new(policy);
        tracing::info!("policy document replaced");
        Ok(())
    }
}

/// Ports + policy, cheap to clone and shared by all orchestrators of a registry.
#[derive(Clone)]
pub struct LifecycleServices {
    pub policy: SharedPolicy,
    pub evaluator: Arc<dyn Evaluator>,
    pub clock: Arc<dyn Clock>,
    pub id_generator: Arc<dyn IdGenerator>,
    pub event_sink: Arc<dyn EventSink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;

    #[test]
    fn test_build_success() {
        let services = OrchestratorBuilder::new()
            .policy(PolicyDocument::default())
            .build();
        assert!(services.is_ok());
    }

    #[test]
    fn test_build_missing_policy() {
        let services = OrchestratorBuilder::new().build();
        assert!(matches!(services, Err(BuildError::MissingPolicy)));
    }

    #[test]
    fn test_build_invalid_policy() {
        let services = OrchestratorBuilder::new()
            .policy(PolicyDocument::with_limits(RiskLevel::Low, -5.0))
            .build();
        assert!(matches!(
            services,
            Err(BuildError::InvalidPolicy(PolicyError::InvalidMaxCost(_)))
        ));
    }

    #[tokio::test]
    async fn test_replace_policy_validates_and_swaps() {
        let shared = SharedPolicy::new(PolicyDocument::default());
        let before = shared.current().await;

        let err = shared
            .replace(PolicyDocument::with_limits(RiskLevel::Low, f64::NAN))
            .await;
        assert!(err.is_err());
        assert_eq!(*shared.current().await, *before);

        shared
            .replace(PolicyDocument::with_limits(RiskLevel::High, 100.0))
            .await
            .unwrap();
        let after = shared.current().await;
        assert_eq!(after.risk.max_level, RiskLevel::High);
        // 古いスナップショットはそのまま
        assert_eq!(before.risk.max_level, RiskLevel::Medium);
    }
}
