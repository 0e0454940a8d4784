//! Board state: the ordered fleet, missed shots, placement and shot
//! registration.

use alloc::vec::Vec;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::cell::{Cell, Orientation};
use crate::cell_set::CellSet;
use crate::common::BoardError;
use crate::config::{BOARD_SIZE, FLEET, NUM_SHIPS};
use crate::ship::{Ship, ShipClass, ShipId};

/// Outcome of a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    /// Shot landed on the segment of the given ship.
    Hit(ShipId),
    /// Shot missed every ship.
    Miss,
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotResult::Hit(_))
    }

    pub fn ship_id(&self) -> Option<ShipId> {
        match self {
            ShotResult::Hit(id) => Some(*id),
            ShotResult::Miss => None,
        }
    }
}

/// One side's board. Ships are kept in placement order; every lookup that
/// needs a "first" ship uses that order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    is_computer: bool,
    ships: Vec<Ship>,
    missed_shots: Vec<Cell>,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new(is_computer: bool) -> Self {
        Board {
            is_computer,
            ships: Vec::with_capacity(NUM_SHIPS),
            missed_shots: Vec::new(),
        }
    }

    /// Create a board with the full fleet placed at random.
    pub fn generate<R: Rng + ?Sized>(is_computer: bool, rng: &mut R) -> Result<Self, BoardError> {
        let mut board = Board::new(is_computer);
        for class in FLEET {
            board.place_random(class, rng)?;
        }
        Ok(board)
    }

    /// Rebuild a board from an already placed fleet, checking that it is a
    /// legal full fleet: the right number of well-formed ships with distinct
    /// ids and no shared cells.
    pub fn from_fleet(is_computer: bool, ships: Vec<Ship>) -> Result<Self, BoardError> {
        if ships.len() != NUM_SHIPS {
            return Err(BoardError::WrongFleetSize {
                expected: NUM_SHIPS,
                actual: ships.len(),
            });
        }
        let mut occupied = CellSet::new();
        for (i, ship) in ships.iter().enumerate() {
            if !ship.is_well_formed() {
                return Err(BoardError::MalformedShip { id: ship.id() });
            }
            if ships[..i].iter().any(|other| other.id() == ship.id()) {
                return Err(BoardError::DuplicateShipId);
            }
            for &cell in ship.cells() {
                if !occupied.insert(cell) {
                    return Err(BoardError::ShipOverlaps { cell });
                }
            }
        }
        Ok(Board {
            is_computer,
            ships,
            missed_shots: Vec::new(),
        })
    }

    pub fn is_computer(&self) -> bool {
        self.is_computer
    }

    /// Ships in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Shots that hit nothing, in the order they were fired.
    pub fn missed_shots(&self) -> &[Cell] {
        &self.missed_shots
    }

    pub fn find_ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|ship| ship.id() == id)
    }

    /// Place a ship of `class` at a random free position.
    ///
    /// The orientation is drawn first and kept; the head is then chosen
    /// uniformly among every head that fits on the board without covering a
    /// cell of an already placed ship.
    pub fn place_random<R: Rng + ?Sized>(
        &mut self,
        class: ShipClass,
        rng: &mut R,
    ) -> Result<&Ship, BoardError> {
        if self.ships.len() >= NUM_SHIPS {
            return Err(BoardError::FleetFull);
        }
        let orientation = if rng.random() {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let candidates = self.candidate_heads(class.length(), orientation);
        let head = *candidates.choose(rng).ok_or(BoardError::NoFreeSpace {
            length: class.length(),
        })?;
        let id = self.fresh_id(rng);
        let ship = Ship::new(id, class, orientation, head)?;
        let idx = self.ships.len();
        self.ships.push(ship);
        Ok(&self.ships[idx])
    }

    /// Every head cell at which a ship of `length` and `orientation` fits on
    /// the board without colliding with a placed ship.
    pub fn candidate_heads(&self, length: usize, orientation: Orientation) -> Vec<Cell> {
        let span = length as i32;
        let (x_limit, y_limit) = match orientation {
            Orientation::Vertical => (BOARD_SIZE - 1, BOARD_SIZE - span),
            Orientation::Horizontal => (BOARD_SIZE - span, BOARD_SIZE - 1),
        };
        let mut heads = Vec::new();
        for x in 0..=x_limit {
            for y in 0..=y_limit {
                let head = Cell::new(x, y);
                if !self.collides(span, orientation, head) {
                    heads.push(head);
                }
            }
        }
        heads
    }

    /// Whether a ship of `span` cells with its head at `head` would share a
    /// cell with any placed ship.
    fn collides(&self, span: i32, orientation: Orientation, head: Cell) -> bool {
        self.ships.iter().any(|placed| {
            let other = placed.head();
            let other_span = placed.length() as i32;
            match (orientation, placed.orientation()) {
                (Orientation::Vertical, Orientation::Vertical) => {
                    head.x == other.x && spans_overlap(head.y, span, other.y, other_span)
                }
                (Orientation::Vertical, Orientation::Horizontal) => {
                    spans_overlap(other.x, other_span, head.x, 1)
                        && spans_overlap(head.y, span, other.y, 1)
                }
                (Orientation::Horizontal, Orientation::Horizontal) => {
                    head.y == other.y && spans_overlap(head.x, span, other.x, other_span)
                }
                (Orientation::Horizontal, Orientation::Vertical) => {
                    spans_overlap(other.y, other_span, head.y, 1)
                        && spans_overlap(head.x, span, other.x, 1)
                }
            }
        })
    }

    fn fresh_id<R: Rng + ?Sized>(&self, rng: &mut R) -> ShipId {
        loop {
            let id = ShipId(rng.random());
            if self.find_ship(id).is_none() {
                return id;
            }
        }
    }

    /// Register a shot at `shot`. A hit marks that segment dead; a miss is
    /// appended to the missed shots. Firing at an already dead segment reports
    /// the same hit again.
    pub fn register_shot(&mut self, shot: Cell) -> ShotResult {
        for ship in self.ships.iter_mut() {
            if ship.hit(shot) {
                return ShotResult::Hit(ship.id());
            }
        }
        self.missed_shots.push(Cell::new(shot.x, shot.y));
        ShotResult::Miss
    }

    /// Flag the ship as dead if every one of its segments has been hit, and
    /// return it. Returns `None` while any segment is intact or when no ship
    /// has this id.
    pub fn mark_dead_if_all_hit(&mut self, id: ShipId) -> Option<&Ship> {
        let ship = self.ships.iter_mut().find(|ship| ship.id() == id)?;
        if ship.mark_dead_if_all_hit() {
            Some(&*ship)
        } else {
            None
        }
    }

    /// Every hit segment across the fleet, dead ships included.
    pub fn wounds(&self) -> Vec<Cell> {
        self.ships
            .iter()
            .flat_map(|ship| ship.damaged_cells())
            .collect()
    }

    /// Ships whose death has been recorded.
    pub fn dead_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|ship| ship.is_dead())
    }

    /// `true` once a fleet is placed and every ship in it is dead.
    pub fn all_dead(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_dead)
    }

    /// Cells covered by ships.
    pub fn occupied(&self) -> CellSet {
        self.ships
            .iter()
            .flat_map(|ship| ship.cells().iter().copied())
            .collect()
    }

    /// Cells already fired at: every miss and every hit segment.
    pub fn shot_cells(&self) -> CellSet {
        let mut tried: CellSet = self.missed_shots.iter().copied().collect();
        tried |= self
            .ships
            .iter()
            .flat_map(|ship| ship.damaged_cells())
            .collect::<CellSet>();
        tried
    }
}

/// Whether `[a, a + a_len)` and `[b, b + b_len)` intersect.
fn spans_overlap(a: i32, a_len: i32, b: i32, b_len: i32) -> bool {
    a < b + b_len && b < a + a_len
}
