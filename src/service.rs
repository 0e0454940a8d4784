//! The game service: creates sessions, answers queries and plays one round
//! per player shot, persisting every change as events.

use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::ai;
use crate::cell::Cell;
use crate::common::{BoardError, TargetError};
use crate::domain::{ComputerMove, CreatedSession, GameStatus, SessionView, ShotOutcome};
use crate::event::{Event, SessionId, Side};
use crate::protocol::GameApi;
use crate::session::{Session, SessionError};
use crate::store::{EventLog, LogError};

/// Errors returned by [`GameService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Target coordinates are off the board.
    InvalidCell(Cell),
    /// The session is already won or lost.
    GameOver(GameStatus),
    /// No events exist for this session.
    NotFound(SessionId),
    Board(BoardError),
    Target(TargetError),
    Session(SessionError),
    Log(LogError),
}

impl GameError {
    /// Whether the request may succeed if simply tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::Log(LogError::Io(_)))
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidCell(cell) => write!(f, "Cell {} is outside the board", cell),
            GameError::GameOver(status) => write!(f, "Game is over ({:?})", status),
            GameError::NotFound(id) => write!(f, "Session {} not found", id),
            GameError::Board(e) => write!(f, "{}", e),
            GameError::Target(e) => write!(f, "{}", e),
            GameError::Session(e) => write!(f, "{}", e),
            GameError::Log(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GameError {}

impl From<BoardError> for GameError {
    fn from(e: BoardError) -> Self {
        GameError::Board(e)
    }
}

impl From<TargetError> for GameError {
    fn from(e: TargetError) -> Self {
        GameError::Target(e)
    }
}

impl From<SessionError> for GameError {
    fn from(e: SessionError) -> Self {
        GameError::Session(e)
    }
}

impl From<LogError> for GameError {
    fn from(e: LogError) -> Self {
        GameError::Log(e)
    }
}

/// Serves any number of sessions over one event log.
///
/// Sessions are never cached: every request rebuilds the session from its
/// events. Shots against the same session are serialized; different
/// sessions proceed independently.
pub struct GameService<L: EventLog, R: Rng + Send = SmallRng> {
    log: L,
    rng: Mutex<R>,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl<L: EventLog> GameService<L, SmallRng> {
    /// Service with a fixed seed, for reproducible games.
    pub fn with_seed(log: L, seed: u64) -> Self {
        Self::new(log, SmallRng::seed_from_u64(seed))
    }

    /// Service seeded from the operating system.
    pub fn from_entropy(log: L) -> Self {
        Self::new(log, SmallRng::from_rng(&mut rand::rng()))
    }
}

impl<L: EventLog, R: Rng + Send> GameService<L, R> {
    pub fn new(log: L, rng: R) -> Self {
        Self {
            log,
            rng: Mutex::new(rng),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Create a session with both fleets placed and record its creation.
    pub async fn create_session(&self) -> Result<CreatedSession, GameError> {
        let (session, event) = {
            let mut rng = self.rng.lock().await;
            Session::create(&mut *rng)?
        };
        self.log.append(session.id(), event.encode()?).await?;
        info!("created session {}", session.id());
        Ok(CreatedSession {
            id: session.id(),
            player: session.player().clone(),
        })
    }

    /// The player's view of a session.
    pub async fn get_session(&self, id: SessionId) -> Result<SessionView, GameError> {
        let session = self.load(id).await?;
        Ok(SessionView::from(&session))
    }

    /// Fire the player's shot at `cell` and, unless that shot ends the game,
    /// let the computer reply. The events of both shots are appended in one
    /// unit after the whole round has been computed.
    pub async fn shoot(&self, id: SessionId, cell: Cell) -> Result<ShotOutcome, GameError> {
        if !cell.is_valid() {
            return Err(GameError::InvalidCell(cell));
        }
        let lock = self.session_lock(id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(id).await?;
        let status = session.status();
        if status.is_over() {
            return Err(GameError::GameOver(status));
        }

        let player = session.fire(Side::Player, cell)?;
        let mut events: Vec<Event> = player.events;

        let computer_move = if session.status().is_over() {
            None
        } else {
            let target = {
                let mut rng = self.rng.lock().await;
                ai::select_target(session.player(), &mut *rng)
            }
            .inspect_err(|e| error!("session {}: {}", id, e))?;
            let reply = session.fire(Side::Computer, target)?;
            events.extend(reply.events);
            Some(ComputerMove {
                cell: reply.cell,
                hit: reply.result.is_hit(),
                destroyed: reply.destroyed,
            })
        };

        let records = events
            .iter()
            .map(Event::encode)
            .collect::<Result<Vec<_>, _>>()?;
        self.log
            .append_all(id, records)
            .await
            .inspect_err(|e| warn!("session {}: round not recorded: {}", id, e))?;

        let status = session.status();
        info!(
            "session {}: player shot {} {}, computer {}",
            id,
            cell,
            if player.result.is_hit() { "hit" } else { "missed" },
            match &computer_move {
                Some(m) => format!("shot {} {}", m.cell, if m.hit { "hit" } else { "missed" }),
                None => "did not reply".to_string(),
            }
        );
        if status.is_over() {
            info!("session {} finished: {:?}", id, status);
        }

        Ok(ShotOutcome {
            hit: player.result.is_hit(),
            destroyed: player.destroyed,
            computer_move,
            status,
        })
    }

    async fn load(&self, id: SessionId) -> Result<Session, GameError> {
        let records = self.log.read_all(id).await?;
        match Session::replay(id, &records) {
            Ok(session) => Ok(session),
            Err(SessionError::Empty) => Err(GameError::NotFound(id)),
            Err(e) => {
                error!("session {}: replay failed: {}", id, e);
                Err(e.into())
            }
        }
    }

    async fn session_lock(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        // Drop locks nobody is holding or waiting on.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(id).or_default().clone()
    }
}

#[async_trait::async_trait]
impl<L: EventLog, R: Rng + Send> GameApi for GameService<L, R> {
    async fn create_session(&self) -> anyhow::Result<CreatedSession> {
        Ok(GameService::create_session(self).await?)
    }

    async fn get_session(&self, id: SessionId) -> anyhow::Result<SessionView> {
        Ok(GameService::get_session(self, id).await?)
    }

    async fn shoot(&self, id: SessionId, cell: Cell) -> anyhow::Result<ShotOutcome> {
        Ok(GameService::shoot(self, id, cell).await?)
    }
}
