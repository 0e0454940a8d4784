use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::event::{EventRecord, SessionId};
use crate::store::{EventLog, LogError};

/// Event log kept in process memory. Lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    streams: Mutex<HashMap<SessionId, Vec<EventRecord>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one record.
    pub async fn session_count(&self) -> usize {
        self.streams.lock().await.len()
    }
}

#[async_trait::async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, session: SessionId, record: EventRecord) -> Result<(), LogError> {
        self.append_all(session, vec![record]).await
    }

    async fn append_all(
        &self,
        session: SessionId,
        records: Vec<EventRecord>,
    ) -> Result<(), LogError> {
        self.streams
            .lock()
            .await
            .entry(session)
            .or_default()
            .extend(records);
        Ok(())
    }

    async fn read_all(&self, session: SessionId) -> Result<Vec<EventRecord>, LogError> {
        Ok(self
            .streams
            .lock()
            .await
            .get(&session)
            .cloned()
            .unwrap_or_default())
    }
}
