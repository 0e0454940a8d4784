use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{DEFAULT_TIMEOUT, MAX_FRAME_SIZE};
use crate::protocol::Message;
use crate::transport::Transport;

/// Messages over TCP as a 4-byte big-endian length followed by a bincode body.
pub struct TcpTransport {
    stream: TcpStream,
    timeout_duration: Duration,
    max_message_size: u32,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, DEFAULT_TIMEOUT, MAX_FRAME_SIZE)
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self::with_config(stream, timeout_duration, MAX_FRAME_SIZE)
    }

    pub fn with_config(stream: TcpStream, timeout_duration: Duration, max_message_size: u32) -> Self {
        Self {
            stream,
            timeout_duration,
            max_message_size,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("Write error: {}", e),
    }
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("Read error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let data = bincode::serialize(&msg)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() > self.max_message_size as usize {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_message_size
            ));
        }

        let send_op = async {
            let len = (data.len() as u32).to_be_bytes();
            self.stream.write_all(&len).await.map_err(write_error)?;
            self.stream.write_all(&data).await.map_err(write_error)?;
            anyhow::Ok(())
        };

        timeout(self.timeout_duration, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.timeout_duration))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let limit = self.timeout_duration;
        timeout(limit, self.read_frame([0u8; 4], 0))
            .await
            .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?
    }

    async fn recv_request(&mut self) -> anyhow::Result<Message> {
        let mut len_buf = [0u8; 4];
        let n = self
            .stream
            .read(&mut len_buf[..1])
            .await
            .map_err(read_error)?;
        if n == 0 {
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        // The rest of a started frame is bounded like any other read.
        let limit = self.timeout_duration;
        timeout(limit, self.read_frame(len_buf, 1))
            .await
            .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?
    }
}

impl TcpTransport {
    /// Read one frame whose first `filled` length bytes are already in `len_buf`.
    async fn read_frame(&mut self, mut len_buf: [u8; 4], filled: usize) -> anyhow::Result<Message> {
        self.stream
            .read_exact(&mut len_buf[filled..])
            .await
            .map_err(read_error)?;

        let len = u32::from_be_bytes(len_buf);
        if len > self.max_message_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_message_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }

        let mut buf = vec![0u8; len as usize];
        self.stream.read_exact(&mut buf).await.map_err(read_error)?;

        bincode::deserialize::<Message>(&buf)
            .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}
