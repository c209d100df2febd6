//! Levels: one puzzle's board, start, goal and editor palette.

use crate::agent::AgentState;
use crate::direction::Direction;
use crate::error::{LevelError, ProgramError};
use crate::grid::Grid;
use crate::instruction::{InstructionKind, Program};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default editor cap when a level definition does not name one.
pub const DEFAULT_MAX_INSTRUCTIONS: usize = 10;

/// An immutable puzzle, built once by the catalog and shared by every attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LevelDef", into = "LevelDef")]
pub struct Level {
    name: String,
    grid: Grid,
    start: AgentState,
    goal: IVec2,
    available: BTreeSet<InstructionKind>,
    max_instructions: usize,
    solution: Option<Program>,
}

impl Level {
    /// Creates a level whose start and goal are taken from `grid`.
    pub fn new(
        name: impl Into<String>,
        grid: Grid,
        facing: Direction,
        available: impl IntoIterator<Item = InstructionKind>,
        max_instructions: usize,
    ) -> Result<Self, LevelError> {
        let available: BTreeSet<_> = available.into_iter().collect();
        if available.is_empty() {
            return Err(LevelError::NoInstructions);
        }
        Ok(Self {
            name: name.into(),
            start: AgentState::new(grid.start(), facing),
            goal: grid.goal(),
            grid,
            available,
            max_instructions,
            solution: None,
        })
    }

    /// Attaches a known-good program, used by tests and the runner's `--solution` flag.
    pub fn with_solution(mut self, solution: Program) -> Result<Self, LevelError> {
        self.check_program(&solution)?;
        self.solution = Some(solution);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> AgentState {
        self.start
    }

    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    pub fn available(&self) -> &BTreeSet<InstructionKind> {
        &self.available
    }

    pub fn allows(&self, kind: InstructionKind) -> bool {
        self.available.contains(&kind)
    }

    pub fn max_instructions(&self) -> usize {
        self.max_instructions
    }

    pub fn solution(&self) -> Option<&Program> {
        self.solution.as_ref()
    }

    /// Editor-side policy check: length cap and enabled instruction kinds.
    ///
    /// The interpreter accepts any program; callers that want the level's
    /// palette and cap enforced run this before submitting.
    pub fn check_program(&self, program: &Program) -> Result<(), ProgramError> {
        if program.len() > self.max_instructions {
            return Err(ProgramError::TooLong {
                len: program.len(),
                max: self.max_instructions,
            });
        }
        for (index, instruction) in program.iter().enumerate() {
            if let Some(kind) = instruction.required_kinds().find(|k| !self.allows(*k)) {
                return Err(ProgramError::Unsupported { index, kind });
            }
        }
        Ok(())
    }
}

fn default_instructions() -> Vec<InstructionKind> {
    InstructionKind::ALL.to_vec()
}

fn default_max_instructions() -> usize {
    DEFAULT_MAX_INSTRUCTIONS
}

/// Serialized form of a [`Level`], as written in catalog files.
///
/// ```toml
/// [[levels]]
/// name = "Around the corner"
/// map = ["S..", "##.", "..G"]
/// facing = "east"
/// instructions = ["move_forward", "turn_right"]
/// max_instructions = 6
/// solution = "f f r f f"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub map: Vec<String>,
    #[serde(default)]
    pub facing: Direction,
    #[serde(default = "default_instructions")]
    pub instructions: Vec<InstructionKind>,
    #[serde(default = "default_max_instructions")]
    pub max_instructions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl TryFrom<LevelDef> for Level {
    type Error = LevelError;

    fn try_from(def: LevelDef) -> Result<Self, Self::Error> {
        let grid = Grid::from_rows(&def.map)?;
        let level = Level::new(
            def.name,
            grid,
            def.facing,
            def.instructions,
            def.max_instructions,
        )?;
        match def.solution {
            Some(text) => level.with_solution(text.parse()?),
            None => Ok(level),
        }
    }
}

impl From<Level> for LevelDef {
    fn from(level: Level) -> Self {
        Self {
            map: level.grid.to_rows(),
            name: level.name,
            facing: level.start.direction,
            instructions: level.available.into_iter().collect(),
            max_instructions: level.max_instructions,
            solution: level.solution.map(|p| p.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::RelativeSense;
    use crate::instruction::{Action, Instruction};

    fn corridor() -> Level {
        Level::new(
            "corridor",
            Grid::from_rows(&["S..G"]).unwrap(),
            Direction::East,
            [InstructionKind::MoveForward, InstructionKind::TurnRight],
            3,
        )
        .unwrap()
    }

    #[test]
    fn start_and_goal_come_from_grid() {
        let level = corridor();
        assert_eq!(level.start(), AgentState::new(IVec2::new(0, 0), Direction::East));
        assert_eq!(level.goal(), IVec2::new(3, 0));
    }

    #[test]
    fn check_program_enforces_cap() {
        let level = corridor();
        let program: Program = "f f f f".parse().unwrap();
        assert_eq!(
            level.check_program(&program),
            Err(ProgramError::TooLong { len: 4, max: 3 })
        );
        assert_eq!(level.check_program(&"f f f".parse().unwrap()), Ok(()));
    }

    #[test]
    fn check_program_enforces_palette() {
        let level = corridor();
        assert_eq!(
            level.check_program(&"f l".parse().unwrap()),
            Err(ProgramError::Unsupported {
                index: 1,
                kind: InstructionKind::TurnLeft
            })
        );
        let conditional = Program::new(vec![Instruction::ConditionalWall {
            sense: RelativeSense::Ahead,
            then: Action::TurnRight,
        }]);
        assert_eq!(
            level.check_program(&conditional),
            Err(ProgramError::Unsupported {
                index: 0,
                kind: InstructionKind::ConditionalWall
            })
        );
    }

    #[test]
    fn conditional_body_must_be_enabled() {
        let level = Level::new(
            "sensing",
            Grid::from_rows(&["S.G"]).unwrap(),
            Direction::East,
            [InstructionKind::ConditionalWall, InstructionKind::MoveForward],
            4,
        )
        .unwrap();
        assert_eq!(
            level.check_program(&"if-wall-ahead:left".parse().unwrap()),
            Err(ProgramError::Unsupported {
                index: 0,
                kind: InstructionKind::TurnLeft
            })
        );
    }

    #[test]
    fn empty_palette_is_rejected() {
        let grid = Grid::from_rows(&["SG"]).unwrap();
        assert_eq!(
            Level::new("empty", grid, Direction::North, [], 1),
            Err(LevelError::NoInstructions)
        );
    }

    #[test]
    fn definition_round_trips_through_toml() {
        let def = LevelDef {
            name: "corner".into(),
            map: vec!["S..".into(), "##.".into(), "..G".into()],
            facing: Direction::East,
            instructions: vec![InstructionKind::MoveForward, InstructionKind::TurnRight],
            max_instructions: 6,
            solution: Some("forward forward right forward forward".into()),
        };
        let level = Level::try_from(def.clone()).unwrap();
        assert_eq!(level.solution().map(|p| p.len()), Some(5));
        assert_eq!(LevelDef::from(level.clone()), def);

        let text = toml::to_string(&level).unwrap();
        let parsed: Level = toml::from_str(&text).unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn invalid_solution_is_rejected() {
        let def = LevelDef {
            name: "bad".into(),
            map: vec!["S.G".into()],
            facing: Direction::East,
            instructions: vec![InstructionKind::MoveForward],
            max_instructions: 1,
            solution: Some("f f".into()),
        };
        assert_eq!(
            Level::try_from(def),
            Err(LevelError::Solution(ProgramError::TooLong { len: 2, max: 1 }))
        );
    }
}
