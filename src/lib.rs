//! # grid-robot
//!
//! A small, deterministic interpreter for robot navigation puzzles: a player
//! assembles a [`Program`] of moves, turns and wall-sensing conditionals, and
//! [`run`] steers an agent across a walled [`Grid`] toward the goal.
//!
//! Interpretation is a pure function of `(Level, Program)`. It returns the full
//! [`ExecutionTrace`] so a presentation layer can animate it afterwards with
//! [`Playback`] or [`replay`], and a [`Progression`] moves the player through
//! a [`LevelCatalog`].

pub mod agent;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod instruction;
pub mod interpreter;
pub mod level;
pub mod outcome;
pub mod playback;
pub mod progression;

pub use agent::*;
pub use catalog::*;
pub use config::*;
pub use direction::*;
pub use error::*;
pub use grid::*;
pub use instruction::*;
pub use interpreter::*;
pub use level::*;
pub use outcome::*;
pub use playback::*;
pub use progression::*;
