//! Append-only event logs, one stream per session.

use crate::event::{EventRecord, SessionId};

pub mod file;
pub mod in_memory;

pub use file::FileEventLog;
pub use in_memory::InMemoryEventLog;

/// Errors returned by an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// Underlying storage failed.
    Io(String),
    /// A record could not be encoded or a stored frame could not be decoded.
    Encoding(String),
    /// A frame exceeds the configured maximum size.
    FrameTooLarge { len: u32, max: u32 },
    /// The log ends in the middle of a frame.
    Truncated,
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::Io(e) => write!(f, "Event log I/O error: {}", e),
            LogError::Encoding(e) => write!(f, "Event log encoding error: {}", e),
            LogError::FrameTooLarge { len, max } => {
                write!(f, "Event frame too large: {} bytes (max: {})", len, max)
            }
            LogError::Truncated => write!(f, "Event log ends in a partial frame"),
        }
    }
}

impl std::error::Error for LogError {}

impl From<std::io::Error> for LogError {
    fn from(e: std::io::Error) -> Self {
        LogError::Io(e.to_string())
    }
}

/// Durable, ordered storage of session events.
///
/// Records of one session are returned by [`EventLog::read_all`] in the
/// order they were appended.
#[async_trait::async_trait]
pub trait EventLog: Send + Sync {
    async fn append(&self, session: SessionId, record: EventRecord) -> Result<(), LogError>;

    /// Append several records as one unit: either all of them become visible
    /// or none do.
    async fn append_all(
        &self,
        session: SessionId,
        records: Vec<EventRecord>,
    ) -> Result<(), LogError>;

    /// Every record of the session in append order. Unknown sessions yield an
    /// empty list.
    async fn read_all(&self, session: SessionId) -> Result<Vec<EventRecord>, LogError>;
}

/// Encode records as length-prefixed bincode frames.
pub fn encode_frames(records: &[EventRecord], max_frame_size: u32) -> Result<Vec<u8>, LogError> {
    let mut buf = Vec::new();
    for record in records {
        let data =
            bincode::serialize(record).map_err(|e| LogError::Encoding(e.to_string()))?;
        let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
        if len > max_frame_size {
            return Err(LogError::FrameTooLarge {
                len,
                max: max_frame_size,
            });
        }
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&data);
    }
    Ok(buf)
}

/// Decode a buffer written by [`encode_frames`].
pub fn decode_frames(mut bytes: &[u8], max_frame_size: u32) -> Result<Vec<EventRecord>, LogError> {
    let mut records = Vec::new();
    while !bytes.is_empty() {
        let (len_buf, rest) = bytes.split_first_chunk::<4>().ok_or(LogError::Truncated)?;
        let len = u32::from_be_bytes(*len_buf);
        if len > max_frame_size {
            return Err(LogError::FrameTooLarge {
                len,
                max: max_frame_size,
            });
        }
        if rest.len() < len as usize {
            return Err(LogError::Truncated);
        }
        let (frame, rest) = rest.split_at(len as usize);
        let record =
            bincode::deserialize(frame).map_err(|e| LogError::Encoding(e.to_string()))?;
        records.push(record);
        bytes = rest;
    }
    Ok(records)
}
