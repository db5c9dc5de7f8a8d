//! Domain model (ids, states, tasks, proposals, policy documents, decisions).

pub mod decision;
pub mod errors;
pub mod events;
pub mod ids;
pub mod policy;
pub mod proposal;
pub mod state;
pub mod task;
pub mod transition;

pub use decision::{Decision, Verdict, Violation};
pub use errors::{DecisionError, PolicyError, ProposalError, TransitionError};
pub use events::DomainEvent;
pub use ids::{ParseIdError, TaskId};
pub use policy::{CostPolicy, DeploymentPolicy, PolicyDocument, RiskPolicy, RollbackPolicy};
pub use proposal::{Proposal, RiskLevel};
pub use state::{ParseStateError, TaskState};
pub use task::{Task, TaskSnapshot};
pub use transition::{TransitionRecord, is_consistent_history};
