use crate::protocol::Message;

/// A bidirectional, ordered channel of protocol messages.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;

    /// Wait for the peer's next request. Unlike [`Transport::recv`] the wait
    /// for the request to start is unbounded; a server calls this between
    /// requests so a thinking player is not cut off.
    async fn recv_request(&mut self) -> anyhow::Result<Message> {
        self.recv().await
    }
}

pub mod in_memory;
pub mod tcp;
