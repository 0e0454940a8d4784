//! A fixed-size set of board cells packed into a `u128`.
//!
//! The set is `no_std` friendly and never allocates. Each of the
//! `BOARD_SIZE × BOARD_SIZE` squares maps to one bit in row-major order.
//! Cells outside the board are never members.

use core::fmt;
use core::ops::{BitOrAssign, Not};

use crate::cell::Cell;
use crate::config::{BOARD_SIZE, GRID_CELLS};

const _: () = assert!(GRID_CELLS <= u128::BITS as usize);

/// Set of cells on one board.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    #[inline]
    fn mask() -> u128 {
        if GRID_CELLS == u128::BITS as usize {
            u128::MAX
        } else {
            (1u128 << GRID_CELLS) - 1
        }
    }

    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        CellSet { bits: 0 }
    }

    /// Number of cells in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_valid() && (self.bits >> cell.index()) & 1 == 1
    }

    /// Adds `cell`. Returns `false` if it was already present or lies off the board.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if !cell.is_valid() || self.contains(cell) {
            return false;
        }
        self.bits |= 1u128 << cell.index();
        true
    }

    /// Iterator over the member cells in row-major order.
    #[inline]
    pub fn iter(&self) -> Cells<'_> {
        Cells { set: self, idx: 0 }
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Cell> for CellSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CellSet({}):", self.len())?;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let bit = if self.contains(Cell::new(x, y)) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the cells of a [`CellSet`].
#[derive(Clone, Copy)]
pub struct Cells<'a> {
    set: &'a CellSet,
    idx: usize,
}

impl Iterator for Cells<'_> {
    type Item = Cell;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < GRID_CELLS {
            let idx = self.idx;
            self.idx += 1;
            if (self.set.bits >> idx) & 1 == 1 {
                return Some(Cell::from_index(idx));
            }
        }
        None
    }
}

impl BitOrAssign for CellSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

/// Complement within the board.
impl Not for CellSet {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        CellSet {
            bits: !self.bits & Self::mask(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut set = CellSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Cell::new(3, 7)));
        assert!(!set.insert(Cell::new(3, 7)));
        assert!(set.contains(Cell::new(3, 7)));
        assert!(!set.contains(Cell::new(7, 3)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn off_board_cells_are_never_members() {
        let mut set = CellSet::new();
        assert!(!set.insert(Cell::new(-1, 0)));
        assert!(!set.insert(Cell::new(0, BOARD_SIZE)));
        assert!(!(!set).contains(Cell::new(BOARD_SIZE, 0)));
    }

    #[test]
    fn complement_and_iteration() {
        let set: CellSet = [Cell::new(0, 0), Cell::new(9, 9)].into_iter().collect();
        let cells: alloc::vec::Vec<_> = set.iter().collect();
        assert_eq!(cells, [Cell::new(0, 0), Cell::new(9, 9)]);
        assert_eq!((!set).len(), GRID_CELLS - 2);
        let mut all = set;
        all |= !set;
        assert_eq!(all.len(), GRID_CELLS);
        assert!((!all).is_empty());
    }
}
