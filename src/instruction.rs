//! The puzzle instruction set and its text form.
//!
//! Conditionals carry an [`Action`], never another [`Instruction`], so a
//! conditional nested inside a conditional cannot be built.
//!
//! Text syntax (tokens separated by whitespace or commas):
//!
//! | Token | Instruction |
//! |-------|-------------|
//! | `forward`, `f` | [`Instruction::MoveForward`] |
//! | `left`, `l` | [`Instruction::TurnLeft`] |
//! | `right`, `r` | [`Instruction::TurnRight`] |
//! | `if-wall-<ahead\|left\|right>:<action>` | [`Instruction::ConditionalWall`] |

use crate::direction::RelativeSense;
use crate::error::ProgramError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// A plain instruction, usable as the body of a conditional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub fn kind(self) -> InstructionKind {
        match self {
            Action::MoveForward => InstructionKind::MoveForward,
            Action::TurnLeft => InstructionKind::TurnLeft,
            Action::TurnRight => InstructionKind::TurnRight,
        }
    }

    fn token(self) -> &'static str {
        match self {
            Action::MoveForward => "forward",
            Action::TurnLeft => "left",
            Action::TurnRight => "right",
        }
    }
}

impl FromStr for Action {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "f" | "move" | "move_forward" => Ok(Action::MoveForward),
            "left" | "l" | "turn_left" => Ok(Action::TurnLeft),
            "right" | "r" | "turn_right" => Ok(Action::TurnRight),
            _ => Err(ProgramError::UnknownInstruction(s.to_string())),
        }
    }
}

/// One step of a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Step one cell forward; blocked by walls and the grid edge.
    MoveForward,
    TurnLeft,
    TurnRight,
    /// Run `then` only if the cell in the `sense` direction is a wall (or off-grid).
    ConditionalWall { sense: RelativeSense, then: Action },
}

impl Instruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::MoveForward => InstructionKind::MoveForward,
            Instruction::TurnLeft => InstructionKind::TurnLeft,
            Instruction::TurnRight => InstructionKind::TurnRight,
            Instruction::ConditionalWall { .. } => InstructionKind::ConditionalWall,
        }
    }

    /// Every kind this instruction needs to be enabled, including a conditional's body.
    pub fn required_kinds(&self) -> impl Iterator<Item = InstructionKind> {
        let body = match self {
            Instruction::ConditionalWall { then, .. } => Some(then.kind()),
            _ => None,
        };
        std::iter::once(self.kind()).chain(body)
    }
}

impl From<Action> for Instruction {
    fn from(action: Action) -> Self {
        match action {
            Action::MoveForward => Instruction::MoveForward,
            Action::TurnLeft => Instruction::TurnLeft,
            Action::TurnRight => Instruction::TurnRight,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::MoveForward => f.write_str("forward"),
            Instruction::TurnLeft => f.write_str("left"),
            Instruction::TurnRight => f.write_str("right"),
            Instruction::ConditionalWall { sense, then } => {
                write!(f, "if-wall-{sense}:{}", then.token())
            }
        }
    }
}

impl FromStr for Instruction {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let lower = token.to_ascii_lowercase();
        let Some(rest) = lower.strip_prefix("if-wall-") else {
            return token.parse::<Action>().map(Instruction::from);
        };
        let unknown = || ProgramError::UnknownInstruction(token.to_string());
        let (sense, then) = rest.split_once(':').ok_or_else(unknown)?;
        let sense = sense.parse::<RelativeSense>().map_err(|_| unknown())?;
        let then = then.parse::<Action>().map_err(|_| unknown())?;
        Ok(Instruction::ConditionalWall { sense, then })
    }
}

/// The instruction families a level can enable in its editor palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    MoveForward,
    TurnLeft,
    TurnRight,
    ConditionalWall,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 4] = [
        InstructionKind::MoveForward,
        InstructionKind::TurnLeft,
        InstructionKind::TurnRight,
        InstructionKind::ConditionalWall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstructionKind::MoveForward => "move_forward",
            InstructionKind::TurnLeft => "turn_left",
            InstructionKind::TurnRight => "turn_right",
            InstructionKind::ConditionalWall => "conditional_wall",
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, immutable snapshot of instructions submitted for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program(Vec<Instruction>);

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }

    pub fn into_inner(self) -> Vec<Instruction> {
        self.0
    }
}

impl Deref for Program {
    type Target = [Instruction];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse::<Instruction>)
            .collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}
