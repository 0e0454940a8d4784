use battleships::store::{decode_frames, encode_frames};
use battleships::{
    Cell, Event, EventLog, FileEventLog, GameService, LogError, SessionId, Side, MAX_FRAME_SIZE,
};
use rand::{rngs::SmallRng, SeedableRng};

fn session_id(seed: u64) -> SessionId {
    SessionId::random(&mut SmallRng::seed_from_u64(seed))
}

#[tokio::test]
async fn appends_are_read_back_in_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log = FileEventLog::open(dir.path()).await?;
    let id = session_id(1);

    let first = Event::shot(id, Cell::new(1, 2), Side::Player).encode()?;
    let rest = vec![
        Event::shot(id, Cell::new(3, 4), Side::Computer).encode()?,
        Event::shot(id, Cell::new(5, 6), Side::Player).encode()?,
    ];
    log.append(id, first.clone()).await?;
    log.append_all(id, rest.clone()).await?;

    let records = log.read_all(id).await?;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], first);
    assert_eq!(&records[1..], rest.as_slice());
    Ok(())
}

#[tokio::test]
async fn unknown_session_reads_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log = FileEventLog::open(dir.path()).await?;
    assert!(log.read_all(session_id(2)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn sessions_survive_a_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (id, before) = {
        let service = GameService::with_seed(FileEventLog::open(dir.path()).await?, 3);
        let id = service.create_session().await?.id;
        for x in 0..5 {
            service.shoot(id, Cell::new(x, x)).await?;
        }
        (id, service.get_session(id).await?)
    };

    let service = GameService::with_seed(FileEventLog::open(dir.path()).await?, 4);
    let after = service.get_session(id).await?;
    assert_eq!(after, before);
    assert_eq!(
        serde_json::to_vec(&after.player)?,
        serde_json::to_vec(&before.player)?
    );

    service.shoot(id, Cell::new(9, 0)).await?;
    let resumed = service.get_session(id).await?;
    assert_eq!(
        resumed.computer_misses.len() + resumed.computer_wounds.len(),
        before.computer_misses.len() + before.computer_wounds.len() + 1
    );
    Ok(())
}

#[tokio::test]
async fn torn_tail_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log = FileEventLog::open(dir.path()).await?;
    let id = session_id(5);
    log.append(id, Event::shot(id, Cell::new(0, 0), Side::Player).encode()?)
        .await?;

    let path = dir.path().join(format!("{}.log", id));
    let mut bytes = std::fs::read(&path)?;
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&path, bytes)?;

    assert_eq!(log.read_all(id).await, Err(LogError::Truncated));
    Ok(())
}

#[tokio::test]
async fn oversized_frame_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log = FileEventLog::with_max_frame_size(dir.path(), 16).await?;
    let id = session_id(6);
    let record = Event::shot(id, Cell::new(0, 0), Side::Player).encode()?;
    assert!(matches!(
        log.append(id, record).await,
        Err(LogError::FrameTooLarge { max: 16, .. })
    ));
    assert!(log.read_all(id).await?.is_empty());
    Ok(())
}

#[test]
fn frames_decode_what_they_encode() {
    let id = session_id(7);
    let records: Vec<_> = (0..4)
        .map(|x| Event::shot(id, Cell::new(x, 0), Side::Player).encode().unwrap())
        .collect();
    let bytes = encode_frames(&records, MAX_FRAME_SIZE).unwrap();
    assert_eq!(decode_frames(&bytes, MAX_FRAME_SIZE).unwrap(), records);
    assert_eq!(
        decode_frames(&[0xFF, 0xFF, 0xFF, 0xFF], MAX_FRAME_SIZE),
        Err(LogError::FrameTooLarge {
            len: u32::MAX,
            max: MAX_FRAME_SIZE
        })
    );
    assert_eq!(decode_frames(&[0, 0], MAX_FRAME_SIZE), Err(LogError::Truncated));
}
