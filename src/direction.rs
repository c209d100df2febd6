//! Compass directions and the rotation algebra the agent moves with.
//!
//! Coordinates are screen-space: `x` grows to the East and `y` grows
//! *downward*, so North is `(0, -1)`. Level maps are written top row first and
//! rely on this; flipping the sign of `y` would mirror every puzzle.

use crate::error::ParseNameError;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four compass directions, ordered clockwise starting at North.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The next direction clockwise.
    pub fn turn_right(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// The next direction counter-clockwise (three right turns).
    pub fn turn_left(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }

    /// The direction behind (two turns either way).
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Unit displacement for one step in this direction (y grows downward).
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
        }
    }

    /// Turns a sense relative to `self` into an absolute direction.
    pub fn resolve(self, sense: RelativeSense) -> Self {
        match sense {
            RelativeSense::Ahead => self,
            RelativeSense::Left => self.turn_left(),
            RelativeSense::Right => self.turn_right(),
        }
    }

    /// Lowercase name, as used in level files.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "up" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" | "down" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            _ => Err(ParseNameError {
                what: "direction",
                name: s.to_string(),
            }),
        }
    }
}

/// Which neighbouring cell a conditional inspects, relative to the agent's heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeSense {
    Ahead,
    Left,
    Right,
}

impl RelativeSense {
    /// Lowercase name, as used in `if-wall-<sense>` tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            RelativeSense::Ahead => "ahead",
            RelativeSense::Left => "left",
            RelativeSense::Right => "right",
        }
    }
}

impl fmt::Display for RelativeSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeSense {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ahead" | "front" => Ok(RelativeSense::Ahead),
            "left" => Ok(RelativeSense::Left),
            "right" => Ok(RelativeSense::Right),
            _ => Err(ParseNameError {
                what: "sense",
                name: s.to_string(),
            }),
        }
    }
}
