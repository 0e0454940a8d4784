use std::sync::Arc;

use crate::cell::Cell;
use crate::domain::{CreatedSession, SessionView, ShotOutcome};
use crate::event::SessionId;

/// Version sent in the opening `Hello` of every connection.
pub const PROTOCOL_VERSION: u16 = 1;

/// Messages exchanged between a game client and the server.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// Handshake, sent by the client and echoed by the server.
    Hello { version: u16 },
    /// Request a new session.
    CreateSession,
    /// Response carrying the new session.
    SessionCreated(CreatedSession),
    /// Request the player's view of a session.
    GetSession { id: SessionId },
    /// Response carrying the player's view.
    Session(SessionView),
    /// Fire at `(x, y)` on the computer's board.
    Shoot { id: SessionId, x: i32, y: i32 },
    /// Response to `Shoot`.
    ShotResult(ShotOutcome),
    /// The request failed.
    Error { message: String },
}

/// Operations a client can perform on the game, locally or over a transport.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    async fn create_session(&self) -> anyhow::Result<CreatedSession>;
    async fn get_session(&self, id: SessionId) -> anyhow::Result<SessionView>;
    async fn shoot(&self, id: SessionId, cell: Cell) -> anyhow::Result<ShotOutcome>;
}

#[async_trait::async_trait]
impl<T: GameApi + ?Sized> GameApi for Arc<T> {
    async fn create_session(&self) -> anyhow::Result<CreatedSession> {
        (**self).create_session().await
    }

    async fn get_session(&self, id: SessionId) -> anyhow::Result<SessionView> {
        (**self).get_session(id).await
    }

    async fn shoot(&self, id: SessionId, cell: Cell) -> anyhow::Result<ShotOutcome> {
        (**self).shoot(id, cell).await
    }
}
