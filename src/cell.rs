//! Board coordinates and ship orientation.

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along `x`.
    Horizontal,
    /// Extends along `y`.
    Vertical,
}

impl Orientation {
    /// Unit step `(dx, dy)` along the axis a ship with this orientation extends on.
    pub const fn step(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// A square on the board.
///
/// Two cells are equal when their coordinates match; `is_dead` only records
/// whether the ship segment occupying the square has been hit.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub is_dead: bool,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_dead: false,
        }
    }

    /// Returns `true` when both coordinates lie in `[0, BOARD_SIZE)`.
    pub const fn is_valid(&self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }

    /// The cell `(x + dx, y + dy)`, whether or not it is on the board.
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The neighbouring cell at `(dx, dy)` if it is on the board.
    pub fn neighbor(&self, dx: i32, dy: i32) -> Option<Self> {
        let cell = self.offset(dx, dy);
        cell.is_valid().then_some(cell)
    }

    /// The two neighbours along the axis of `orientation` (above and below
    /// for vertical, left and right for horizontal), skipping squares off the
    /// board.
    pub fn axis_neighbors(&self, orientation: Orientation) -> impl Iterator<Item = Cell> {
        let (dx, dy) = orientation.step();
        [self.neighbor(-dx, -dy), self.neighbor(dx, dy)]
            .into_iter()
            .flatten()
    }

    /// All four orthogonal neighbours that are on the board: above, below,
    /// left, right.
    pub fn orthogonal_neighbors(&self) -> impl Iterator<Item = Cell> {
        self.axis_neighbors(Orientation::Vertical)
            .chain(self.axis_neighbors(Orientation::Horizontal))
    }

    /// Row-major index into a `BOARD_SIZE × BOARD_SIZE` grid. Only meaningful
    /// for valid cells.
    pub(crate) const fn index(&self) -> usize {
        (self.y * BOARD_SIZE + self.x) as usize
    }

    pub(crate) const fn from_index(idx: usize) -> Self {
        let idx = idx as i32;
        Self::new(idx % BOARD_SIZE, idx / BOARD_SIZE)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
