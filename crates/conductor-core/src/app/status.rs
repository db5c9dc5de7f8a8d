//! Status - 状態ごとのタスク数

use serde::{Deserialize, Serialize};

use crate::domain::TaskState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub received: usize,
    pub classified: usize,
    pub proposed: usize,
    pub validated: usize,
    pub approved: usize,
    pub executing: usize,
    pub completed: usize,
    pub rolled_back: usize,
    pub failed: usize,
}

impl StateCounts {
    pub fn record(&mut self, state: TaskState) {
        let slot = match state {
            TaskState::Received => &mut self.received,
            TaskState::Classified => &mut self.classified,
            TaskState::Proposed => &mut self.proposed,
            TaskState::Validated => &mut self.validated,
            TaskState::Approved => &mut self.approved,
            TaskState::Executing => &mut self.executing,
            TaskState::Completed => &mut self.completed,
            TaskState::RolledBack => &mut self.rolled_back,
            TaskState::Failed => &mut self.failed,
        };
        *slot += 1;
    }

    pub fn get(&self, state: TaskState) -> usize {
        match state {
            TaskState::Received => self.received,
            TaskState::Classified => self.classified,
            TaskState::Proposed => self.proposed,
            TaskState::Validated => self.validated,
            TaskState::Approved => self.approved,
            TaskState::Executing => self.executing,
            TaskState::Completed => self.completed,
            TaskState::RolledBack => self.rolled_back,
            TaskState::Failed => self.failed,
        }
    }

    pub fn total(&self) -> usize {
        TaskState::ALL.into_iter().map(|s| self.get(s)).sum()
    }
}

impl FromIterator<TaskState> for StateCounts {
    fn from_iter<I: IntoIterator<Item = TaskState>>(iter: I) -> Self {
        let mut counts = StateCounts::default();
        for state in iter {
            counts.record(state);
        }
        counts
    }
}
