//! Errors shared by the board, ship and targeting logic.

use crate::cell::Cell;
use crate::ship::ShipId;

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The board already carries its full fleet.
    FleetFull,
    /// No head cell left for a ship of this length. Indicates corrupted state.
    NoFreeSpace { length: usize },
    /// Ship body would leave the board.
    ShipOutOfBounds { head: Cell },
    /// Ship body would cover a cell of another ship.
    ShipOverlaps { cell: Cell },
    /// A fleet does not have the expected number of ships.
    WrongFleetSize { expected: usize, actual: usize },
    /// Two ships share an identifier.
    DuplicateShipId,
    /// A ship's body does not match its class and orientation.
    MalformedShip { id: ShipId },
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::FleetFull => write!(f, "Board already has its full fleet"),
            BoardError::NoFreeSpace { length } => {
                write!(f, "No free space left for a ship of length {}", length)
            }
            BoardError::ShipOutOfBounds { head } => {
                write!(f, "Ship with head {} does not fit on the board", head)
            }
            BoardError::ShipOverlaps { cell } => {
                write!(f, "Ship placement overlaps another ship at {}", cell)
            }
            BoardError::WrongFleetSize { expected, actual } => {
                write!(f, "Fleet has {} ships, expected {}", actual, expected)
            }
            BoardError::DuplicateShipId => write!(f, "Two ships share an identifier"),
            BoardError::MalformedShip { id } => write!(f, "Ship {} has a malformed body", id),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// Errors returned by the targeting heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    /// Every square has already been shot at.
    NoCandidates,
}

impl core::fmt::Display for TargetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TargetError::NoCandidates => write!(f, "No untried cell left to target"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TargetError {}
