//! Lifecycle step: decide what a transition request turns into.
//!
//! `plan_transition` is pure: it reads the task, never mutates it, and either
//! returns the record to append or the reason the request is refused.
//! Applying the plan is the orchestrator's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Decision, PolicyDocument, Proposal, Task, TaskState, TransitionError, TransitionRecord,
};
use crate::ports::Evaluator;

/// Extra input for a transition request.
///
/// The proposal is required for `Validated -> Approved | Failed` and ignored
/// everywhere else.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionContext {
    proposal: Option<Proposal>,
}

impl TransitionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proposal(proposal: Proposal) -> Self {
        Self {
            proposal: Some(proposal),
        }
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }
}

impl From<Proposal> for TransitionContext {
    fn from(proposal: Proposal) -> Self {
        Self::with_proposal(proposal)
    }
}

impl From<Option<Proposal>> for TransitionContext {
    fn from(proposal: Option<Proposal>) -> Self {
        Self { proposal }
    }
}

/// A transition that passed every check and is ready to append.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransition {
    pub record: TransitionRecord,
    /// Present only for the policy-gated edge.
    pub decision: Option<Decision>,
}

/// Result of an accepted transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub state: TaskState,
    pub history: Vec<TransitionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}

/// Check `requested` against the table and, on the policy-gated edge, let the
/// evaluator choose the real target.
///
/// 1. `requested` must be a successor of the current state.
/// 2. `Validated -> Approved | Failed` needs a proposal; the verdict picks the
///    target (`Approve -> Approved`, `Reject -> Failed`) whatever was requested,
///    and a rejection's violations become the record's reason.
/// 3. Any other legal edge is taken as requested.
pub fn plan_transition(
    task: &Task,
    requested: TaskState,
    context: &TransitionContext,
    policy: &PolicyDocument,
    evaluator: &dyn Evaluator,
    at: DateTime<Utc>,
) -> Result<PlannedTransition, TransitionError> {
    let from = task.state();
    if !from.can_transition_to(requested) {
        return Err(TransitionError::InvalidTransition { from, to: requested });
    }

    if !from.is_policy_gated(requested) {
        return Ok(PlannedTransition {
            record: TransitionRecord::new(from, requested, at, None),
            decision: None,
        });
    }

    let proposal = context
        .proposal()
        .ok_or(TransitionError::MissingProposal { from, to: requested })?;
    let decision = evaluator.evaluate(proposal, policy);
    let to = if decision.is_approved() {
        TaskState::Approved
    } else {
        TaskState::Failed
    };
    if to != requested {
        tracing::debug!(
            task_id = %task.id(),
            requested = %requested,
            decided = %to,
            "policy verdict overrides requested target"
        );
    }

    Ok(PlannedTransition {
        record: TransitionRecord::new(from, to, at, decision.reason()),
        decision: Some(decision),
    })
}
