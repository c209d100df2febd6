//! Executes a [`Program`](crate::Program) against a [`Level`] and records the trace.
//!
//! The entry point is [`run`]. It is a pure function of its inputs: the same
//! level and program always yield the same [`ExecutionResult`], and nothing is
//! shared between calls, so any number of threads may call it at once.

use crate::agent::AgentState;
use crate::direction::RelativeSense;
use crate::grid::Grid;
use crate::instruction::{Action, Instruction};
use crate::level::Level;
use crate::outcome::{ExecutionResult, ExecutionTrace};

/// Runs `program` from the level's start state.
///
/// Each instruction produces one new state, so the trace has
/// `program.len() + 1` entries with the start state at index 0. Success means
/// the final position equals the level's goal; passing over the goal earlier
/// in the run does not count.
///
/// The level's instruction palette and length cap are not checked here; see
/// [`Level::check_program`].
pub fn run(level: &Level, program: &[Instruction]) -> ExecutionResult {
    let mut state = level.start();
    let mut trace = ExecutionTrace::with_capacity(program.len() + 1);
    trace.push(state);

    for instruction in program {
        state = apply(instruction, state, level.grid());
        trace.push(state);
    }

    let success = state.position == level.goal();
    tracing::debug!(
        level = level.name(),
        instructions = program.len(),
        success,
        final_state = %state,
        "program finished"
    );

    ExecutionResult {
        trace,
        success,
        final_state: state,
    }
}

/// Applies one instruction to `state`, returning the next state.
pub fn apply(instruction: &Instruction, state: AgentState, grid: &Grid) -> AgentState {
    match *instruction {
        Instruction::MoveForward => apply_action(Action::MoveForward, state, grid),
        Instruction::TurnLeft => apply_action(Action::TurnLeft, state, grid),
        Instruction::TurnRight => apply_action(Action::TurnRight, state, grid),
        Instruction::ConditionalWall { sense, then } => {
            if senses_wall(state, sense, grid) {
                apply_action(then, state, grid)
            } else {
                state
            }
        }
    }
}

/// Applies a non-conditional action.
///
/// A move into a wall or off the grid returns `state` unchanged.
pub fn apply_action(action: Action, state: AgentState, grid: &Grid) -> AgentState {
    match action {
        Action::MoveForward => {
            let candidate = state.ahead();
            if grid.is_wall(candidate) {
                tracing::trace!(from = %state, x = candidate.x, y = candidate.y, "move blocked");
                state
            } else {
                state.with_position(candidate)
            }
        }
        Action::TurnLeft => state.with_direction(state.direction.turn_left()),
        Action::TurnRight => state.with_direction(state.direction.turn_right()),
    }
}

/// Whether the neighbour in the `sense` direction is a wall or off the grid.
///
/// Read-only: sensing never changes the agent.
pub fn senses_wall(state: AgentState, sense: RelativeSense, grid: &Grid) -> bool {
    let direction = state.direction.resolve(sense);
    grid.is_wall(state.neighbour(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use glam::IVec2;

    fn grid() -> Grid {
        Grid::from_rows(&["S.#", "...", "..G"]).unwrap()
    }

    #[test]
    fn move_is_blocked_by_wall_and_edge() {
        let grid = grid();
        let facing_wall = AgentState::new(IVec2::new(1, 0), Direction::East);
        assert_eq!(apply(&Instruction::MoveForward, facing_wall, &grid), facing_wall);

        let facing_edge = AgentState::new(IVec2::new(0, 0), Direction::West);
        assert_eq!(apply(&Instruction::MoveForward, facing_edge, &grid), facing_edge);

        let open = AgentState::new(IVec2::new(0, 0), Direction::South);
        assert_eq!(
            apply(&Instruction::MoveForward, open, &grid),
            AgentState::new(IVec2::new(0, 1), Direction::South)
        );
    }

    #[test]
    fn conditional_senses_relative_to_heading() {
        let grid = grid();
        // Facing South at (1,0): left is East, the wall at (2,0).
        let state = AgentState::new(IVec2::new(1, 0), Direction::South);
        assert!(senses_wall(state, RelativeSense::Left, &grid));
        assert!(!senses_wall(state, RelativeSense::Ahead, &grid));
        // Right is West, (0,0), free.
        assert!(!senses_wall(state, RelativeSense::Right, &grid));

        let turn = Instruction::ConditionalWall {
            sense: RelativeSense::Left,
            then: Action::TurnRight,
        };
        assert_eq!(apply(&turn, state, &grid).direction, Direction::West);

        let skipped = Instruction::ConditionalWall {
            sense: RelativeSense::Right,
            then: Action::MoveForward,
        };
        assert_eq!(apply(&skipped, state, &grid), state);
    }

    #[test]
    fn conditional_move_is_still_wall_checked() {
        let grid = grid();
        // Wall ahead, and the body tries to walk into it anyway.
        let state = AgentState::new(IVec2::new(1, 0), Direction::East);
        let bump = Instruction::ConditionalWall {
            sense: RelativeSense::Ahead,
            then: Action::MoveForward,
        };
        assert_eq!(apply(&bump, state, &grid), state);
    }
}
