//! conductor-core
//!
//! Decision core of the control plane: the task lifecycle state machine and
//! the policy gate on `Validated -> Approved | Failed`.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, task, transition, proposal, policy, decision, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, Evaluator, EventSink）
//! - **app**: アプリケーションロジック（builder, evaluator, lifecycle, orchestrator, registry, status）
//! - **settings**: ポリシー文書とログ設定の読み込み

pub mod app;
pub mod domain;
pub mod ports;
pub mod settings;

pub use app::{
    LifecycleOrchestrator, OrchestratorBuilder, PolicyEvaluator, TaskRegistry, TransitionContext,
    TransitionOutcome,
};
pub use domain::{
    Decision, PolicyDocument, Proposal, RiskLevel, TaskId, TaskState, TransitionError,
    TransitionRecord, Verdict,
};
