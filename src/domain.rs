//! Values exchanged with clients of the game service.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::Cell;
use crate::event::SessionId;
use crate::session::Session;
use crate::ship::Ship;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// Every computer ship is dead.
    Won,
    /// Every player ship is dead.
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Returned when a session is created: its id and the player's own board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSession {
    pub id: SessionId,
    pub player: Board,
}

/// A session as the player is allowed to see it: their own board in full,
/// and of the computer's board only what their shots have revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub player: Board,
    pub computer_dead_ships: Vec<Ship>,
    pub computer_wounds: Vec<Cell>,
    pub computer_misses: Vec<Cell>,
    pub status: GameStatus,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let computer = session.computer();
        SessionView {
            id: session.id(),
            player: session.player().clone(),
            computer_dead_ships: computer.dead_ships().cloned().collect(),
            computer_wounds: computer.wounds(),
            computer_misses: computer.missed_shots().to_vec(),
            status: session.status(),
        }
    }
}

/// The computer's reply shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerMove {
    /// Target cell; `is_dead` is set when the shot hit.
    pub cell: Cell,
    pub hit: bool,
    pub destroyed: Option<Ship>,
}

/// Result of one player shot and the computer's reply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotOutcome {
    pub hit: bool,
    pub destroyed: Option<Ship>,
    /// `None` when the player's shot ended the game.
    pub computer_move: Option<ComputerMove>,
    pub status: GameStatus,
}
