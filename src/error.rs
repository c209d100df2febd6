//! Error types for grid construction, level loading and program validation.
//!
//! None of these can come out of [`run`](crate::run): interpretation is total.
//! They surface when building worlds, parsing programs, or driving progression.

use crate::instruction::InstructionKind;
use crate::progression::ProgressState;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what}: {name:?}")]
pub struct ParseNameError {
    pub(crate) what: &'static str,
    pub(crate) name: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("map has no rows")]
    Empty,

    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroSize { width: usize, height: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {tile:?} at ({x}, {y})")]
    UnknownTile { tile: char, x: i32, y: i32 },

    #[error("map has no start cell")]
    MissingStart,

    #[error("map has no goal cell")]
    MissingGoal,

    #[error("map has more than one start cell")]
    MultipleStarts,

    #[error("map has more than one goal cell")]
    MultipleGoals,

    #[error("{what} ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("{what} ({x}, {y}) is a wall")]
    OnWall { what: &'static str, x: i32, y: i32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("level enables no instruction kinds")]
    NoInstructions,

    #[error("bad reference solution: {0}")]
    Solution(#[from] ProgramError),
}

/// A program the editor should never have submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("program has {len} instructions, level allows {max}")]
    TooLong { len: usize, max: usize },

    #[error("instruction {index} uses {kind}, which this level does not offer")]
    Unsupported { index: usize, kind: InstructionKind },

    #[error("unknown instruction {0:?}")]
    UnknownInstruction(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("level {index} ({name:?}): {source}")]
    Level {
        index: usize,
        name: String,
        #[source]
        source: LevelError,
    },

    #[error("catalog contains no levels")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("no level is in progress (state: {0:?})")]
    NoActiveLevel(ProgressState),

    #[error("level {0} is still locked")]
    LevelLocked(usize),

    #[error("level {index} does not exist ({len} levels)")]
    OutOfRange { index: usize, len: usize },
}
