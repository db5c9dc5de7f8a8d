//! Evaluator port - Proposal と PolicyDocument から Decision を生成
//!
//! # 設計原則
//! - 純粋関数（同じ入力には常に同じ Decision）
//! - 副作用なし、共有状態なし（並行呼び出しに同期は不要）

use crate::domain::{Decision, PolicyDocument, Proposal};

pub trait Evaluator: Send + Sync {
    fn evaluate(&self, proposal: &Proposal, policy: &PolicyDocument) -> Decision;
}
