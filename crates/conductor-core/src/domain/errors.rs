//! Errors - ドメインエラー
//!
//! どのエラーも 1 回の呼び出しに閉じていて、失敗時にタスクの状態は変わりません。
//! ポリシー違反はエラーではなく `Decision` の値として返ります。

use thiserror::Error;

use super::decision::Verdict;
use super::state::TaskState;

/// A requested state change that the lifecycle refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `(from, to)` is not an edge of the lifecycle graph
    /// (includes self-loops and anything out of a terminal state).
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: TaskState, to: TaskState },

    /// A policy-gated edge was requested without a proposal.
    #[error("transition {from} -> {to} requires a proposal for policy review")]
    MissingProposal { from: TaskState, to: TaskState },
}

impl TransitionError {
    /// State the task was in when the request was refused (unchanged).
    pub fn from_state(&self) -> TaskState {
        match *self {
            TransitionError::InvalidTransition { from, .. }
            | TransitionError::MissingProposal { from, .. } => from,
        }
    }

    pub fn attempted(&self) -> TaskState {
        match *self {
            TransitionError::InvalidTransition { to, .. }
            | TransitionError::MissingProposal { to, .. } => to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProposalError {
    #[error("cost_usd must not be negative (got {0})")]
    NegativeCost(f64),

    #[error("cost_usd must be a finite number")]
    NonFiniteCost,

    #[error("unknown risk level '{0}' (expected low, medium or high)")]
    UnknownRiskLevel(String),
}

/// A serialized decision whose verdict disagrees with its violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("verdict {verdict:?} does not match {violations} violation(s)")]
    VerdictMismatch { verdict: Verdict, violations: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("cost.max_usd must be a finite, non-negative number (got {0})")]
    InvalidMaxCost(f64),

    #[error("deployment.canary_percent must be within 0-100 (got {0})")]
    CanaryPercentOutOfRange(u8),

    #[error("deployment.strategy must not be empty")]
    EmptyDeploymentStrategy,

    #[error("rollback.error_rate_pct must be a finite number (got {0})")]
    InvalidErrorRate(f64),
}
