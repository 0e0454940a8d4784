// Hunt/target guessing logic for the computer's shots.
// Works from the attacked board's shot history only and allocates a single
// candidate list per call.

use alloc::vec::Vec;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::{
    board::Board,
    cell::{Cell, Orientation},
    cell_set::CellSet,
    common::TargetError,
    ship::{Ship, ShipId},
};

/// Which phase the heuristic is in for a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// No live damage known: search the whole board.
    Hunt,
    /// Finishing off the wounded ship with this id.
    Target(ShipId),
}

/// The cells the heuristic would choose between, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub mode: TargetMode,
    pub cells: Vec<Cell>,
}

/// Compute the candidate cells for the next shot against `board`.
///
/// The first wounded ship in placement order is targeted. With a single hit
/// on it every untried orthogonal neighbour is a candidate. With more hits
/// the damaged cells give the axis, and the untried axis neighbours of the
/// last damaged cell are used, falling back to those of the first damaged
/// cell. When targeting yields nothing the whole untried board is searched.
pub fn candidates(board: &Board) -> Candidates {
    let tried = board.shot_cells();
    if let Some(ship) = board.ships().iter().find(|ship| ship.is_wounded()) {
        let cells = target_cells(ship, &tried);
        if !cells.is_empty() {
            return Candidates {
                mode: TargetMode::Target(ship.id()),
                cells,
            };
        }
    }
    Candidates {
        mode: TargetMode::Hunt,
        cells: (!tried).iter().collect(),
    }
}

/// Choose the computer's next shot against `board`, uniformly among the
/// current candidates. Never returns a missed cell or a hit segment.
pub fn select_target<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<Cell, TargetError> {
    candidates(board)
        .cells
        .choose(rng)
        .copied()
        .ok_or(TargetError::NoCandidates)
}

fn untried(cells: impl Iterator<Item = Cell>, tried: &CellSet) -> Vec<Cell> {
    cells.filter(|cell| !tried.contains(*cell)).collect()
}

fn target_cells(ship: &Ship, tried: &CellSet) -> Vec<Cell> {
    let damaged: Vec<Cell> = ship.damaged_cells().collect();
    match damaged.as_slice() {
        [] => Vec::new(),
        [only] => untried(only.orthogonal_neighbors(), tried),
        [first, .., last] => {
            let axis = if damaged.iter().all(|cell| cell.x == first.x) {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            let cells = untried(last.axis_neighbors(axis), tried);
            if cells.is_empty() {
                untried(first.axis_neighbors(axis), tried)
            } else {
                cells
            }
        }
    }
}
