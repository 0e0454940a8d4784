use anyhow::anyhow;
use log::{debug, warn};

use crate::cell::Cell;
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Server side of a connection: reads requests from the transport, calls the
/// engine and writes back one reply per request.
pub struct Skeleton<E: GameApi, T: Transport> {
    engine: E,
    transport: T,
}

impl<E: GameApi, T: Transport> Skeleton<E, T> {
    pub fn new(engine: E, transport: T) -> Self {
        Self { engine, transport }
    }

    /// Serve until the peer disconnects. Engine failures are reported to the
    /// client as [`Message::Error`] and do not end the connection.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Hello { version } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::Hello {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
            }
            Message::Hello { version } => {
                let message = format!(
                    "Protocol version mismatch: expected {}, got {}",
                    PROTOCOL_VERSION, version
                );
                self.transport
                    .send(Message::Error {
                        message: message.clone(),
                    })
                    .await?;
                return Err(anyhow!(message));
            }
            _ => return Err(anyhow!("Expected handshake")),
        }

        while let Ok(msg) = self.transport.recv_request().await {
            debug!("request: {:?}", msg);
            let reply = match self.handle(msg).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("request failed: {}", e);
                    Message::Error {
                        message: e.to_string(),
                    }
                }
            };
            self.transport.send(reply).await?;
        }
        Ok(())
    }

    async fn handle(&self, msg: Message) -> anyhow::Result<Message> {
        match msg {
            Message::CreateSession => Ok(Message::SessionCreated(
                self.engine.create_session().await?,
            )),
            Message::GetSession { id } => Ok(Message::Session(self.engine.get_session(id).await?)),
            Message::Shoot { id, x, y } => Ok(Message::ShotResult(
                self.engine.shoot(id, Cell::new(x, y)).await?,
            )),
            other => Err(anyhow!("Unexpected request: {:?}", other)),
        }
    }
}
