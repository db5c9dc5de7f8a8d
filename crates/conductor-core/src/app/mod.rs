//! App - アプリケーション層
//!
//! ports と domain を組み合わせてライフサイクルを動かします。
//!
//! # 主要コンポーネント
//! - **OrchestratorBuilder**: ポートとポリシーのワイヤリング（起動時検証）
//! - **PolicyEvaluator**: リスク上限 + コスト上限の評価
//! - **plan_transition**: 遷移の純粋な判定
//! - **LifecycleOrchestrator**: 1 タスクの状態と履歴（タスク単位のロック）
//! - **TaskRegistry**: task_id からの検索と集計

pub mod builder;
pub mod evaluator;
pub mod lifecycle;
pub mod orchestrator;
pub mod registry;
pub mod status;

pub use self::builder::{BuildError, LifecycleServices, OrchestratorBuilder, SharedPolicy};
pub use self::evaluator::PolicyEvaluator;
pub use self::lifecycle::{PlannedTransition, TransitionContext, TransitionOutcome, plan_transition};
pub use self::orchestrator::LifecycleOrchestrator;
pub use self::registry::{RegistryError, TaskRegistry};
pub use self::status::StateCounts;
