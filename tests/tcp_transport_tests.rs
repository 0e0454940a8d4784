use std::sync::Arc;

use battleships::transport::Transport;
use battleships::{
    Cell, GameApi, GameService, InMemoryEventLog, Message, Skeleton, Stub, TcpTransport,
    PROTOCOL_VERSION,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn test_stub_skeleton_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = Arc::new(GameService::with_seed(InMemoryEventLog::new(), 1));

    let engine = Arc::clone(&service);
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let transport = TcpTransport::new(socket);
        let mut skeleton = Skeleton::new(engine, transport);
        skeleton.run().await.unwrap();
    });

    let stub = Stub::new(TcpTransport::connect(addr).await?);

    let created = stub.create_session().await?;
    let outcome = stub.shoot(created.id, Cell::new(2, 7)).await?;
    let view = stub.get_session(created.id).await?;
    assert_eq!(view.player, created.player);
    assert_eq!(outcome.status, view.status);
    assert_eq!(view, service.get_session(created.id).await?);

    drop(stub);
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn two_clients_share_one_service() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = Arc::new(GameService::with_seed(InMemoryEventLog::new(), 2));

    let engine = Arc::clone(&service);
    tokio::spawn(async move {
        loop {
            let (socket, _) = listener.accept().await.unwrap();
            let mut skeleton = Skeleton::new(Arc::clone(&engine), TcpTransport::new(socket));
            tokio::spawn(async move { skeleton.run().await });
        }
    });

    let first = Stub::new(TcpTransport::connect(addr).await?);
    let second = Stub::new(TcpTransport::connect(addr).await?);
    let id = first.create_session().await?.id;

    // A session created through one connection is playable through another.
    second.shoot(id, Cell::new(0, 0)).await?;
    let view = first.get_session(id).await?;
    assert_eq!(view.computer_misses.len() + view.computer_wounds.len(), 1);
    assert_eq!(service.log().session_count().await, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn idle_client_outlives_request_timeout() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = Arc::new(GameService::with_seed(InMemoryEventLog::new(), 4));

    let engine = Arc::clone(&service);
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let transport = TcpTransport::with_timeout(socket, Duration::from_millis(200));
        let mut skeleton = Skeleton::new(engine, transport);
        skeleton.run().await
    });

    let stub = Stub::new(TcpTransport::connect(addr).await?);
    let id = stub.create_session().await?.id;

    // Think for longer than the server's per-request timeout.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!server.is_finished());

    stub.shoot(id, Cell::new(4, 4)).await?;
    let view = stub.get_session(id).await?;
    assert_eq!(view.computer_misses.len() + view.computer_wounds.len(), 1);

    drop(stub);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_length_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0u8, 0, 0, 0]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("Invalid message length"));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_receive_timeout() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut transport = TcpTransport::with_timeout(stream, Duration::from_millis(50));
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("timeout"));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_peer_close_is_reported() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut transport = TcpTransport::connect(addr).await?;
    server_task.await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed") || err.to_string().contains("reset"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_handshake_roundtrip() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = GameService::with_seed(InMemoryEventLog::new(), 3);

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut skeleton = Skeleton::new(service, TcpTransport::new(socket));
        skeleton.run().await
    });

    let mut client = TcpTransport::connect(addr).await?;
    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    assert!(matches!(
        client.recv().await?,
        Message::Hello { version } if version == PROTOCOL_VERSION
    ));
    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    assert!(matches!(client.recv().await?, Message::Error { .. }));

    drop(client);
    server.await??;
    Ok(())
}
