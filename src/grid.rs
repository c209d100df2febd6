//! Immutable walled grid the agent moves on.

use crate::error::GridError;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single square of the puzzle board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub wall: bool,
    pub is_goal: bool,
    pub is_start: bool,
}

impl Cell {
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

/// Rectangular board with exactly one start cell and exactly one goal cell.
///
/// Cells are stored row-major. Nothing hands out `&mut` access, so a grid is
/// frozen once [`Grid::new`] or [`Grid::from_rows`] returns it. The serde form
/// is the ASCII map, so deserializing goes through the same validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: IVec2,
    goal: IVec2,
}

impl Grid {
    /// Builds a grid from its dimensions, wall positions, start and goal.
    ///
    /// Walls outside the bounds are ignored. Start and goal must lie inside the
    /// grid and must not be walls; they may share a cell.
    pub fn new(
        width: usize,
        height: usize,
        walls: impl IntoIterator<Item = IVec2>,
        start: IVec2,
        goal: IVec2,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSize { width, height });
        }

        let mut cells: Vec<Cell> = (0..height as i32)
            .flat_map(|y| {
                (0..width as i32).map(move |x| Cell {
                    x,
                    y,
                    wall: false,
                    is_goal: false,
                    is_start: false,
                })
            })
            .collect();

        let index = |p: IVec2| -> Option<usize> {
            (p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height)
                .then(|| p.y as usize * width + p.x as usize)
        };

        for wall in walls {
            if let Some(i) = index(wall) {
                cells[i].wall = true;
            }
        }

        let locate = |what: &'static str, pos: IVec2| -> Result<usize, GridError> {
            let i = index(pos).ok_or(GridError::OutOfBounds {
                what,
                x: pos.x,
                y: pos.y,
                width,
                height,
            })?;
            if cells[i].wall {
                return Err(GridError::OnWall {
                    what,
                    x: pos.x,
                    y: pos.y,
                });
            }
            Ok(i)
        };
        let start_index = locate("start", start)?;
        let goal_index = locate("goal", goal)?;
        cells[start_index].is_start = true;
        cells[goal_index].is_goal = true;

        Ok(Self {
            width,
            height,
            cells,
            start,
            goal,
        })
    }

    /// Parses an ASCII map, top row first.
    ///
    /// | Tile | Meaning |
    /// |------|---------|
    /// | `.`  | free cell |
    /// | `#`  | wall |
    /// | `S`  | start |
    /// | `G`  | goal |
    /// | `*`  | start and goal on the same cell |
    ///
    /// Whitespace inside a row is ignored, so `". # ."` and `".#."` are the same row.
    pub fn from_rows<R: AsRef<str>>(rows: &[R]) -> Result<Self, GridError> {
        let rows: Vec<Vec<char>> = rows
            .iter()
            .map(|r| r.as_ref().chars().filter(|c| !c.is_whitespace()).collect())
            .filter(|r: &Vec<char>| !r.is_empty())
            .collect();

        let width = rows.first().map(Vec::len).ok_or(GridError::Empty)?;
        let height = rows.len();

        let mut walls = Vec::new();
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &tile) in row.iter().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                let (is_start, is_goal) = match tile {
                    '.' => (false, false),
                    '#' => {
                        walls.push(pos);
                        (false, false)
                    }
                    'S' => (true, false),
                    'G' => (false, true),
                    '*' => (true, true),
                    _ => {
                        return Err(GridError::UnknownTile {
                            tile,
                            x: pos.x,
                            y: pos.y,
                        });
                    }
                };
                if is_start && start.replace(pos).is_some() {
                    return Err(GridError::MultipleStarts);
                }
                if is_goal && goal.replace(pos).is_some() {
                    return Err(GridError::MultipleGoals);
                }
            }
        }

        let start = start.ok_or(GridError::MissingStart)?;
        let goal = goal.ok_or(GridError::MissingGoal)?;
        Self::new(width, height, walls, start, goal)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> IVec2 {
        self.start
    }

    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// The map in [`from_rows`](Self::from_rows) notation, one string per row.
    pub fn to_rows(&self) -> Vec<String> {
        self.to_string().lines().map(str::to_string).collect()
    }

    /// The cell at `pos`, or `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, pos: IVec2) -> Option<&Cell> {
        if self.contains(pos) {
            Some(&self.cells[pos.y as usize * self.width + pos.x as usize])
        } else {
            None
        }
    }

    /// True for walled cells *and* for every position outside the grid.
    ///
    /// Movement and sensing both rely on the edge behaving exactly like a wall.
    #[inline]
    pub fn is_wall(&self, pos: IVec2) -> bool {
        self.cell_at(pos).is_none_or(|cell| cell.wall)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                let tile = match (cell.wall, cell.is_start, cell.is_goal) {
                    (true, _, _) => '#',
                    (_, true, true) => '*',
                    (_, true, false) => 'S',
                    (_, false, true) => 'G',
                    _ => '.',
                };
                write!(f, "{tile}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}
