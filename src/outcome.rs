//! What one run of a program produces.

use crate::agent::AgentState;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Every agent state visited during a run, start state first.
///
/// Always holds exactly `program.len() + 1` entries: a blocked move still
/// records its (unchanged) state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace(Vec<AgentState>);

impl ExecutionTrace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, state: AgentState) {
        self.0.push(state);
    }

    /// The state before any instruction ran.
    pub fn start(&self) -> Option<&AgentState> {
        self.0.first()
    }

    /// The state after the `step`-th instruction (1-based; 0 is the start).
    pub fn state_after(&self, step: usize) -> Option<&AgentState> {
        self.0.get(step)
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.0.iter().map(|s| s.position)
    }

    pub fn into_inner(self) -> Vec<AgentState> {
        self.0
    }
}

impl Deref for ExecutionTrace {
    type Target = [AgentState];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The outcome of running a program against a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub trace: ExecutionTrace,

    /// Whether the final position is the level's goal.
    pub success: bool,

    pub final_state: AgentState,
}

impl ExecutionResult {
    pub fn is_solved(&self) -> bool {
        self.success
    }

    /// Number of steps that left the agent exactly where and how it was.
    ///
    /// That covers blocked moves and conditionals whose sensed cell was free.
    pub fn idle_steps(&self) -> usize {
        self.trace.windows(2).filter(|w| w[0] == w[1]).count()
    }

    /// Number of steps that changed the agent's position.
    pub fn cells_moved(&self) -> usize {
        self.trace
            .windows(2)
            .filter(|w| w[0].position != w[1].position)
            .count()
    }
}
