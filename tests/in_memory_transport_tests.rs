use std::sync::Arc;

use battleships::transport::Transport;
use battleships::{
    Cell, GameApi, GameService, GameStatus, InMemoryEventLog, InMemoryTransport, Message,
    Skeleton, Stub, PROTOCOL_VERSION,
};

#[tokio::test(flavor = "multi_thread")]
async fn test_stub_skeleton_in_memory() -> anyhow::Result<()> {
    let (server_transport, client_transport) = InMemoryTransport::pair();
    let service = Arc::new(GameService::with_seed(InMemoryEventLog::new(), 1));

    let engine = Arc::clone(&service);
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(engine, server_transport);
        skeleton.run().await.unwrap();
    });

    let stub = Stub::new(client_transport);

    let created = stub.create_session().await?;
    assert_eq!(created.player.ships().len(), 3);

    let outcome = stub.shoot(created.id, Cell::new(4, 4)).await?;
    assert!(outcome.computer_move.is_some());

    let view = stub.get_session(created.id).await?;
    assert_eq!(view.status, GameStatus::InProgress);
    assert_eq!(view.computer_misses.len() + view.computer_wounds.len(), 1);
    assert_eq!(view, service.get_session(created.id).await?);

    drop(stub);
    server.await.unwrap();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_errors_keep_the_connection_open() -> anyhow::Result<()> {
    let (server_transport, client_transport) = InMemoryTransport::pair();
    let service = Arc::new(GameService::with_seed(InMemoryEventLog::new(), 2));
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(service, server_transport);
        skeleton.run().await
    });

    let stub = Stub::new(client_transport);
    let id = stub.create_session().await?.id;

    let err = stub.shoot(id, Cell::new(12, 0)).await.unwrap_err();
    assert!(err.to_string().contains("outside the board"));

    assert!(stub.shoot(id, Cell::new(0, 0)).await.is_ok());

    drop(stub);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn version_mismatch_is_refused() -> anyhow::Result<()> {
    let (server_transport, mut client) = InMemoryTransport::pair();
    let service = GameService::with_seed(InMemoryEventLog::new(), 3);
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(service, server_transport);
        skeleton.run().await
    });

    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION + 1,
        })
        .await?;
    assert!(matches!(client.recv().await?, Message::Error { .. }));
    assert!(server.await?.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn request_before_handshake_is_refused() -> anyhow::Result<()> {
    let (server_transport, mut client) = InMemoryTransport::pair();
    let service = GameService::with_seed(InMemoryEventLog::new(), 4);
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(service, server_transport);
        skeleton.run().await
    });

    client.send(Message::CreateSession).await?;
    let err = server.await?.unwrap_err();
    assert!(err.to_string().contains("Expected handshake"));
    Ok(())
}

#[tokio::test]
async fn closed_pair_reports_closed_channel() {
    let (mut a, b) = InMemoryTransport::pair();
    drop(b);
    assert!(a.recv().await.is_err());
    assert!(a.send(Message::CreateSession).await.is_err());
}
