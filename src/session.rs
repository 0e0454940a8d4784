//! A game session: both boards, rebuilt from and advanced by events.

use log::{debug, warn};
use rand::Rng;

use crate::board::{Board, ShotResult};
use crate::cell::Cell;
use crate::common::BoardError;
use crate::domain::GameStatus;
use crate::event::{Event, EventPayload, EventRecord, SessionId, Side};
use crate::ship::Ship;

/// Errors raised while rebuilding or advancing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The log holds no events for the session.
    Empty,
    /// The first event in the log does not create the session.
    NotCreated,
    /// A stored event cannot be decoded or does not fit the session state.
    Corrupt { reason: String },
    /// An event could not be encoded for storage.
    Serialization(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Empty => write!(f, "Session has no events"),
            SessionError::NotCreated => {
                write!(f, "Session log does not start with a creation event")
            }
            SessionError::Corrupt { reason } => write!(f, "Corrupt session log: {}", reason),
            SessionError::Serialization(e) => write!(f, "Event serialization failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<BoardError> for SessionError {
    fn from(e: BoardError) -> Self {
        SessionError::Corrupt {
            reason: e.to_string(),
        }
    }
}

/// Result of one shot fired through [`Session::fire`].
#[derive(Debug, Clone)]
pub struct Volley {
    pub cell: Cell,
    pub result: ShotResult,
    /// The ship this shot sank, if any.
    pub destroyed: Option<Ship>,
    /// Events produced by the shot, already applied to the session.
    pub events: Vec<Event>,
}

/// Both boards of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    player: Board,
    computer: Board,
}

impl Session {
    /// An empty shell: no ships on either board.
    pub fn shell(id: SessionId) -> Self {
        Self {
            id,
            player: Board::new(false),
            computer: Board::new(true),
        }
    }

    /// Start a new session with a fresh id and both fleets placed at random.
    /// Returns the session together with its creation event.
    pub fn create<R: Rng + ?Sized>(rng: &mut R) -> Result<(Self, Event), BoardError> {
        let id = SessionId::random(rng);
        let player = Board::generate(false, rng)?;
        let computer = Board::generate(true, rng)?;
        let event = Event::session_created(id, &player, &computer);
        Ok((
            Self {
                id,
                player,
                computer,
            },
            event,
        ))
    }

    /// Rebuild a session by applying its stored events in order.
    ///
    /// The first record must be the creation event. Records of unknown kinds
    /// after it are skipped.
    pub fn replay(id: SessionId, records: &[EventRecord]) -> Result<Self, SessionError> {
        let (first, rest) = records.split_first().ok_or(SessionError::Empty)?;
        if first.event_type != EventPayload::SESSION_CREATED {
            return Err(SessionError::NotCreated);
        }
        let created = Event::decode(first)?.ok_or(SessionError::NotCreated)?;
        let mut session = Session::shell(id);
        session.apply(&created)?;
        for record in rest {
            if let Some(event) = Event::decode(record)? {
                session.apply(&event)?;
            }
        }
        Ok(session)
    }

    /// Apply one event to the session state.
    pub fn apply(&mut self, event: &Event) -> Result<(), SessionError> {
        if event.aggregate_id != self.id {
            return Err(SessionError::Corrupt {
                reason: format!(
                    "event for session {} applied to {}",
                    event.aggregate_id, self.id
                ),
            });
        }
        match &event.payload {
            EventPayload::SessionCreated(created) => {
                if !self.player.ships().is_empty() || !self.computer.ships().is_empty() {
                    warn!("session {}: ignoring repeated creation event", self.id);
                    return Ok(());
                }
                self.player = Board::from_fleet(false, created.player.clone())?;
                self.computer = Board::from_fleet(true, created.computer.clone())?;
            }
            EventPayload::Shot(shot) => {
                if !shot.cell.is_valid() {
                    return Err(SessionError::Corrupt {
                        reason: format!("shot at {} is off the board", shot.cell),
                    });
                }
                self.board_mut(shot.shooter.opponent())
                    .register_shot(shot.cell);
            }
            EventPayload::ShipDestroyed(destroyed) => {
                if self
                    .board_mut(destroyed.owner)
                    .mark_dead_if_all_hit(destroyed.ship_id)
                    .is_none()
                {
                    debug!(
                        "session {}: ship {} not sunk on {} board",
                        self.id, destroyed.ship_id, destroyed.owner
                    );
                }
            }
        }
        Ok(())
    }

    /// Fire a shot from `shooter` at the opposing board. Every state change
    /// goes through [`Session::apply`], so replaying the returned events on
    /// the previous state gives exactly the new state.
    pub fn fire(&mut self, shooter: Side, cell: Cell) -> Result<Volley, SessionError> {
        let target = shooter.opponent();
        let shot = Event::shot(self.id, cell, shooter);
        self.apply(&shot)?;
        let mut events = vec![shot];

        let result = match self.board(target).ships().iter().find(|s| s.contains(cell)) {
            Some(ship) => ShotResult::Hit(ship.id()),
            None => ShotResult::Miss,
        };

        let mut destroyed = None;
        if let ShotResult::Hit(ship_id) = result {
            let sinks = self
                .board(target)
                .find_ship(ship_id)
                .is_some_and(|ship| !ship.is_dead() && ship.damage_count() == ship.length());
            if sinks {
                let event = Event::ship_destroyed(self.id, ship_id, target);
                self.apply(&event)?;
                events.push(event);
                destroyed = self.board(target).find_ship(ship_id).cloned();
            }
        }

        Ok(Volley {
            cell: Cell {
                is_dead: result.is_hit(),
                ..Cell::new(cell.x, cell.y)
            },
            result,
            destroyed,
            events,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn player(&self) -> &Board {
        &self.player
    }

    pub fn computer(&self) -> &Board {
        &self.computer
    }

    /// The board owned by `side`.
    pub fn board(&self, side: Side) -> &Board {
        match side {
            Side::Player => &self.player,
            Side::Computer => &self.computer,
        }
    }

    fn board_mut(&mut self, side: Side) -> &mut Board {
        match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.computer,
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.computer.all_dead() {
            GameStatus::Won
        } else if self.player.all_dead() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }
}
