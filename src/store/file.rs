use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::MAX_FRAME_SIZE;
use crate::event::{EventRecord, SessionId};
use crate::store::{decode_frames, encode_frames, EventLog, LogError};

/// Event log keeping one file per session under a directory. Each file is a
/// sequence of length-prefixed bincode frames.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    dir: PathBuf,
    max_frame_size: u32,
}

impl FileEventLog {
    /// Open a log rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, LogError> {
        Self::with_max_frame_size(dir, MAX_FRAME_SIZE).await
    }

    pub async fn with_max_frame_size(
        dir: impl Into<PathBuf>,
        max_frame_size: u32,
    ) -> Result<Self, LogError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            max_frame_size,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, session: SessionId) -> PathBuf {
        self.dir.join(format!("{}.log", session))
    }
}

#[async_trait::async_trait]
impl EventLog for FileEventLog {
    async fn append(&self, session: SessionId, record: EventRecord) -> Result<(), LogError> {
        self.append_all(session, vec![record]).await
    }

    async fn append_all(
        &self,
        session: SessionId,
        records: Vec<EventRecord>,
    ) -> Result<(), LogError> {
        // Encode everything first so a bad record leaves the file untouched.
        let buf = encode_frames(&records, self.max_frame_size)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(session))
            .await?;
        let start = file.metadata().await?.len();
        let written = async {
            file.write_all(&buf).await?;
            file.sync_data().await
        }
        .await;
        if let Err(e) = written {
            return Err(rollback(&file, start, e).await);
        }
        debug!("appended {} events to session {}", records.len(), session);
        Ok(())
    }

    async fn read_all(&self, session: SessionId) -> Result<Vec<EventRecord>, LogError> {
        match fs::read(self.path(session)).await {
            Ok(bytes) => decode_frames(&bytes, self.max_frame_size),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Cut `file` back to `len` after a failed append so no torn frame is left
/// behind, and return the append's error.
async fn rollback(file: &File, len: u64, cause: std::io::Error) -> LogError {
    if let Err(e) = file.set_len(len).await {
        warn!("could not truncate event log after failed append: {}", e);
    }
    cause.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::event::{Event, Side};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn failed_append_leaves_the_log_readable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let log = FileEventLog::open(dir.path()).await?;
        let id = SessionId::random(&mut SmallRng::seed_from_u64(1));
        let first = Event::shot(id, Cell::new(1, 1), Side::Player).encode()?;
        log.append(id, first.clone()).await?;

        // Half of a frame reaches the disk before the write fails.
        let next = Event::shot(id, Cell::new(2, 2), Side::Computer).encode()?;
        let frame = encode_frames(&[next.clone()], MAX_FRAME_SIZE)?;
        let mut file = OpenOptions::new().append(true).open(log.path(id)).await?;
        let start = file.metadata().await?.len();
        file.write_all(&frame[..frame.len() / 2]).await?;
        file.flush().await?;
        let err = rollback(&file, start, std::io::Error::other("disk full")).await;
        assert!(matches!(err, LogError::Io(_)));
        drop(file);

        assert_eq!(log.read_all(id).await?, vec![first.clone()]);
        log.append(id, next.clone()).await?;
        assert_eq!(log.read_all(id).await?, vec![first, next]);
        Ok(())
    }
}
