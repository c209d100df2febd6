//! Level-to-level progression across an ordered list of levels.
//!
//! ```text
//! NotStarted --start--> InProgress(0)
//! InProgress(i) --submit, fail--> InProgress(i)
//! InProgress(i) --submit, success--> InProgress(i + 1) | AllComplete
//!                                    (or Solved(i) until `advance` when auto_advance is off)
//! ```

use crate::error::ProgressionError;
use crate::instruction::Instruction;
use crate::interpreter::run;
use crate::level::Level;
use crate::outcome::ExecutionResult;
use serde::{Deserialize, Serialize};

/// Where the player is in the level sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressState {
    NotStarted,
    InProgress(usize),
    Solved(usize),
    AllComplete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Move straight to the next level on success instead of stopping at `Solved`.
    pub auto_advance: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self { auto_advance: true }
    }
}

/// Tracks which levels are solved and which one is being attempted.
///
/// Retries are unlimited; [`attempts`](Self::attempts) is only a counter for
/// whoever wants to show it.
#[derive(Debug)]
pub struct Progression<'a> {
    levels: &'a [Level],
    config: ProgressionConfig,
    state: ProgressState,
    solved: Vec<bool>,
    attempts: Vec<u32>,
}

impl<'a> Progression<'a> {
    pub fn new(levels: &'a [Level], config: ProgressionConfig) -> Self {
        Self {
            levels,
            config,
            state: ProgressState::NotStarted,
            solved: vec![false; levels.len()],
            attempts: vec![0; levels.len()],
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn levels(&self) -> &'a [Level] {
        self.levels
    }

    /// The level being attempted or just solved.
    pub fn current_level(&self) -> Option<&'a Level> {
        match self.state {
            ProgressState::InProgress(i) | ProgressState::Solved(i) => self.levels.get(i),
            _ => None,
        }
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.solved.get(index).copied().unwrap_or(false)
    }

    pub fn solved_count(&self) -> usize {
        self.solved.iter().filter(|s| **s).count()
    }

    pub fn attempts(&self, index: usize) -> u32 {
        self.attempts.get(index).copied().unwrap_or(0)
    }

    /// A level is playable once it is solved or it is the first unsolved one.
    pub fn is_unlocked(&self, index: usize) -> bool {
        if index >= self.levels.len() {
            return false;
        }
        let frontier = self.solved.iter().position(|s| !s).unwrap_or(self.levels.len());
        index <= frontier
    }

    /// Leaves `NotStarted` for the first level. Has no effect in any other state.
    pub fn start(&mut self) -> ProgressState {
        if self.state == ProgressState::NotStarted {
            let next = if self.levels.is_empty() {
                ProgressState::AllComplete
            } else {
                ProgressState::InProgress(0)
            };
            self.transition(next);
        }
        self.state
    }

    /// Runs `program` on the current level and moves on if it reaches the goal.
    pub fn submit(&mut self, program: &[Instruction]) -> Result<ExecutionResult, ProgressionError> {
        let ProgressState::InProgress(index) = self.state else {
            return Err(ProgressionError::NoActiveLevel(self.state));
        };
        let levels = self.levels;
        let level = &levels[index];

        self.attempts[index] = self.attempts[index].saturating_add(1);
        let result = run(level, program);

        if result.success {
            self.solved[index] = true;
            tracing::info!(
                level = level.name(),
                index,
                attempts = self.attempts[index],
                "level solved"
            );
            self.transition(ProgressState::Solved(index));
            if self.config.auto_advance {
                self.advance()?;
            }
        }

        Ok(result)
    }

    /// Moves from `Solved(i)` to the next level, or to `AllComplete` after the last one.
    pub fn advance(&mut self) -> Result<ProgressState, ProgressionError> {
        let ProgressState::Solved(index) = self.state else {
            return Err(ProgressionError::NoActiveLevel(self.state));
        };
        let next = if index + 1 < self.levels.len() {
            ProgressState::InProgress(index + 1)
        } else {
            ProgressState::AllComplete
        };
        self.transition(next);
        Ok(self.state)
    }

    /// Jumps to an unlocked level, e.g. to replay one already solved.
    pub fn select(&mut self, index: usize) -> Result<ProgressState, ProgressionError> {
        if index >= self.levels.len() {
            return Err(ProgressionError::OutOfRange {
                index,
                len: self.levels.len(),
            });
        }
        if !self.is_unlocked(index) {
            return Err(ProgressionError::LevelLocked(index));
        }
        self.transition(ProgressState::InProgress(index));
        Ok(self.state)
    }

    fn transition(&mut self, next: ProgressState) {
        tracing::debug!(from = ?self.state, to = ?next, "progression");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::grid::Grid;
    use crate::instruction::{InstructionKind, Program};

    fn levels() -> Vec<Level> {
        let straight = Level::new(
            "straight",
            Grid::from_rows(&["G", ".", "S"]).unwrap(),
            Direction::North,
            InstructionKind::ALL,
            5,
        )
        .unwrap();
        let turn = Level::new(
            "turn",
            Grid::from_rows(&["S.G"]).unwrap(),
            Direction::North,
            InstructionKind::ALL,
            5,
        )
        .unwrap();
        vec![straight, turn]
    }

    fn program(text: &str) -> Program {
        text.parse().unwrap()
    }

    #[test]
    fn walks_through_every_level() {
        let levels = levels();
        let mut progress = Progression::new(&levels, ProgressionConfig::default());
        assert_eq!(progress.state(), ProgressState::NotStarted);
        assert_eq!(progress.start(), ProgressState::InProgress(0));

        let failed = progress.submit(&program("f")).unwrap();
        assert!(!failed.success);
        assert_eq!(progress.state(), ProgressState::InProgress(0));

        assert!(progress.submit(&program("f f")).unwrap().success);
        assert_eq!(progress.state(), ProgressState::InProgress(1));
        assert_eq!(progress.attempts(0), 2);

        assert!(progress.submit(&program("r f f")).unwrap().success);
        assert_eq!(progress.state(), ProgressState::AllComplete);
        assert_eq!(progress.solved_count(), 2);

        assert!(matches!(
            progress.submit(&program("f")),
            Err(ProgressionError::NoActiveLevel(ProgressState::AllComplete))
        ));
    }

    #[test]
    fn manual_advance_parks_in_solved() {
        let levels = levels();
        let mut progress = Progression::new(&levels, ProgressionConfig { auto_advance: false });
        progress.start();
        progress.submit(&program("f f")).unwrap();
        assert_eq!(progress.state(), ProgressState::Solved(0));
        assert_eq!(progress.current_level().map(Level::name), Some("straight"));
        assert!(progress.submit(&program("f f")).is_err());
        assert_eq!(progress.advance(), Ok(ProgressState::InProgress(1)));
        assert!(progress.advance().is_err());
    }

    #[test]
    fn submit_before_start_is_rejected() {
        let levels = levels();
        let mut progress = Progression::new(&levels, ProgressionConfig::default());
        assert_eq!(
            progress.submit(&program("f")).unwrap_err(),
            ProgressionError::NoActiveLevel(ProgressState::NotStarted)
        );
    }

    #[test]
    fn select_respects_locking() {
        let levels = levels();
        let mut progress = Progression::new(&levels, ProgressionConfig::default());
        assert_eq!(progress.select(1), Err(ProgressionError::LevelLocked(1)));
        assert_eq!(
            progress.select(7),
            Err(ProgressionError::OutOfRange { index: 7, len: 2 })
        );
        assert_eq!(progress.select(0), Ok(ProgressState::InProgress(0)));
        progress.submit(&program("f f")).unwrap();
        assert_eq!(progress.select(0), Ok(ProgressState::InProgress(0)));
        assert!(progress.is_unlocked(1));
    }

    #[test]
    fn attempt_counter_saturates() {
        let levels = levels();
        let mut progress = Progression::new(&levels, ProgressionConfig::default());
        progress.start();
        progress.attempts[0] = u32::MAX;
        assert!(!progress.submit(&program("f")).unwrap().success);
        assert_eq!(progress.attempts(0), u32::MAX);
        assert_eq!(progress.state(), ProgressState::InProgress(0));
    }

    #[test]
    fn empty_level_list_completes_immediately() {
        let mut progress = Progression::new(&[], ProgressionConfig::default());
        assert_eq!(progress.start(), ProgressState::AllComplete);
    }
}
