use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::cell::Cell;
use crate::domain::{CreatedSession, SessionView, ShotOutcome};
use crate::event::SessionId;
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Client side of a connection: implements [`GameApi`] by sending requests
/// over the transport.
pub struct Stub<T: Transport> {
    transport: Mutex<T>,
    handshaken: AtomicBool,
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
            handshaken: AtomicBool::new(false),
        }
    }

    /// Send `request` and wait for its reply, performing the handshake first
    /// if it has not happened yet.
    async fn call(&self, request: Message) -> anyhow::Result<Message> {
        let mut transport = self.transport.lock().await;
        if !self.handshaken.load(Ordering::SeqCst) {
            transport
                .send(Message::Hello {
                    version: PROTOCOL_VERSION,
                })
                .await?;
            match transport.recv().await? {
                Message::Hello { version } if version == PROTOCOL_VERSION => {
                    self.handshaken.store(true, Ordering::SeqCst);
                }
                Message::Error { message } => return Err(anyhow::anyhow!(message)),
                _ => return Err(anyhow::anyhow!("Unexpected handshake reply")),
            }
        }
        transport.send(request).await?;
        match transport.recv().await? {
            Message::Error { message } => Err(anyhow::anyhow!(message)),
            reply => Ok(reply),
        }
    }
}

#[async_trait::async_trait]
impl<T: Transport> GameApi for Stub<T> {
    async fn create_session(&self) -> anyhow::Result<CreatedSession> {
        match self.call(Message::CreateSession).await? {
            Message::SessionCreated(created) => Ok(created),
            _ => Err(anyhow::anyhow!("Unexpected message")),
        }
    }

    async fn get_session(&self, id: SessionId) -> anyhow::Result<SessionView> {
        match self.call(Message::GetSession { id }).await? {
            Message::Session(view) => Ok(view),
            _ => Err(anyhow::anyhow!("Unexpected message")),
        }
    }

    async fn shoot(&self, id: SessionId, cell: Cell) -> anyhow::Result<ShotOutcome> {
        let request = Message::Shoot {
            id,
            x: cell.x,
            y: cell.y,
        };
        match self.call(request).await? {
            Message::ShotResult(outcome) => Ok(outcome),
            _ => Err(anyhow::anyhow!("Unexpected message")),
        }
    }
}
