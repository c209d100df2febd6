//! Agent state: where the robot stands and which way it faces.

use crate::direction::Direction;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A snapshot of the agent.
///
/// This is a `Copy` value. The interpreter never mutates a state in place; each
/// instruction yields a fresh snapshot that is appended to the trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentState {
    /// Grid position (screen-space, `y` grows downward).
    pub position: IVec2,

    /// Current heading.
    pub direction: Direction,
}

impl AgentState {
    pub fn new(position: IVec2, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Column, growing to the East.
    pub fn x(&self) -> i32 {
        self.position.x
    }

    /// Row, growing downward (South).
    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// The cell one step away in the current heading.
    pub fn ahead(&self) -> IVec2 {
        self.neighbour(self.direction)
    }

    /// The cell one step away in an absolute direction.
    pub fn neighbour(&self, direction: Direction) -> IVec2 {
        self.position + direction.delta()
    }

    /// The same heading at a new position.
    pub fn with_position(self, position: IVec2) -> Self {
        Self { position, ..self }
    }

    /// The same position with a new heading.
    pub fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) facing {}",
            self.position.x, self.position.y, self.direction
        )
    }
}
