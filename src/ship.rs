//! Ship definitions: class, identity and per-segment damage.

use alloc::vec::Vec;
use core::fmt;

use crate::cell::{Cell, Orientation};
use crate::common::BoardError;

/// Class of ship: fixes its name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipClass {
    Destroyer,
    Battleship,
}

impl ShipClass {
    /// Ship's name.
    pub const fn name(self) -> &'static str {
        match self {
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Battleship => "Battleship",
        }
    }

    /// Ship's length.
    pub const fn length(self) -> usize {
        match self {
            ShipClass::Destroyer => 4,
            ShipClass::Battleship => 5,
        }
    }
}

/// Opaque ship identifier, unique within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ShipId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A ship on a board. `cells[0]` is the head; every further cell steps one
/// square along the orientation axis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    id: ShipId,
    class: ShipClass,
    orientation: Orientation,
    cells: Vec<Cell>,
    is_dead: bool,
}

impl Ship {
    /// Build a ship with its head at `head`, extending along `orientation`.
    /// Fails if any part of the body falls off the board.
    pub fn new(
        id: ShipId,
        class: ShipClass,
        orientation: Orientation,
        head: Cell,
    ) -> Result<Self, BoardError> {
        let (dx, dy) = orientation.step();
        let cells: Vec<Cell> = (0..class.length() as i32)
            .map(|i| head.offset(dx * i, dy * i))
            .collect();
        if !cells.iter().all(Cell::is_valid) {
            return Err(BoardError::ShipOutOfBounds { head });
        }
        Ok(Ship {
            id,
            class,
            orientation,
            cells,
            is_dead: false,
        })
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn length(&self) -> usize {
        self.class.length()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    /// Head cell of the ship.
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Body cells in order from the head, carrying their damage state.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Set once every segment has been hit and the death was recorded.
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Hit segments in body order.
    pub fn damaged_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied().filter(|c| c.is_dead)
    }

    pub fn damage_count(&self) -> usize {
        self.damaged_cells().count()
    }

    /// Damaged but still afloat.
    pub fn is_wounded(&self) -> bool {
        let damage = self.damage_count();
        !self.is_dead && damage > 0 && damage < self.length()
    }

    /// Mark the segment at `cell` as hit. Returns `false` if the ship does not
    /// cover `cell`.
    pub(crate) fn hit(&mut self, cell: Cell) -> bool {
        match self.cells.iter_mut().find(|c| **c == cell) {
            Some(segment) => {
                segment.is_dead = true;
                true
            }
            None => false,
        }
    }

    /// Record the ship's death if every segment has been hit.
    pub(crate) fn mark_dead_if_all_hit(&mut self) -> bool {
        if self.damage_count() == self.length() {
            self.is_dead = true;
        }
        self.is_dead
    }

    /// Checks a ship that arrived from outside (e.g. a decoded event): its body
    /// must match its class and orientation and lie on the board, and a dead
    /// flag requires every segment to be hit.
    pub fn is_well_formed(&self) -> bool {
        if self.cells.len() != self.length() || !self.cells.iter().all(Cell::is_valid) {
            return false;
        }
        let (dx, dy) = self.orientation.step();
        let head = self.cells[0];
        let contiguous = self
            .cells
            .iter()
            .zip(0i32..)
            .all(|(c, i)| *c == head.offset(dx * i, dy * i));
        contiguous && (!self.is_dead || self.damage_count() == self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_extends_along_orientation() {
        let ship = Ship::new(
            ShipId(1),
            ShipClass::Destroyer,
            Orientation::Vertical,
            Cell::new(2, 3),
        )
        .unwrap();
        let cells: Vec<_> = ship.cells().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, [(2, 3), (2, 4), (2, 5), (2, 6)]);
        assert!(ship.is_well_formed());
    }

    #[test]
    fn rejects_body_off_the_board() {
        let err = Ship::new(
            ShipId(1),
            ShipClass::Battleship,
            Orientation::Horizontal,
            Cell::new(6, 0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BoardError::ShipOutOfBounds {
                head: Cell::new(6, 0)
            }
        );
    }
}
