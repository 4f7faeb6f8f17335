//! Drives a real client session against an in-process server.

use std::time::Duration;

use roomcast_client::{
    ConnectionStatus, SessionMirror, error::ClientError, session::run_client_session,
};
use roomcast_server::{config::ServerConfig, ui::Server};
use tokio::{net::TcpListener, sync::mpsc, sync::oneshot};

const SETTLE: Duration = Duration::from_millis(300);

async fn start_server() -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        Server::new(ServerConfig::default())
            .serve(listener, async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });
    (format!("ws://127.0.0.1:{}/ws", port), shutdown_tx)
}

#[tokio::test]
async fn test_session_mirrors_created_room() {
    // テスト項目: /create を送るとミラーがサーバーからの応答で InRoom になる
    // given (前提条件):
    let (url, shutdown) = start_server().await;
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let session = tokio::spawn(async move {
        let mut mirror = SessionMirror::new("Alice");
        mirror.on_connecting();
        let result = run_client_session(&url, &mut mirror, &mut input_rx).await;
        (result, mirror)
    });

    // when (操作):
    tokio::time::sleep(SETTLE).await;
    input_tx.send("/create Algebra".to_string()).unwrap();
    tokio::time::sleep(SETTLE).await;
    input_tx.send("hello".to_string()).unwrap();
    tokio::time::sleep(SETTLE).await;
    drop(input_tx);
    let (result, mirror) = tokio::time::timeout(Duration::from_secs(5), session)
        .await
        .unwrap()
        .unwrap();

    // then (期待する結果):
    assert!(result.is_ok());
    assert_eq!(mirror.status(), ConnectionStatus::InRoom);
    let room = mirror.room().unwrap();
    assert_eq!(room.name, "Algebra");
    assert_eq!(mirror.players().len(), 1);
    assert!(mirror.is_me(&mirror.players()[0].id));
    let chat: Vec<&str> = mirror.chat_log().map(|c| c.content.as_str()).collect();
    assert_eq!(chat, vec!["hello"]);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_session_reports_refused_connection() {
    // テスト項目: 接続できないサーバーは ConnectionError として報告される
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let mut mirror = SessionMirror::new("Alice");

    // when (操作):
    let result = run_client_session(
        &format!("ws://127.0.0.1:{}/ws", port),
        &mut mirror,
        &mut input_rx,
    )
    .await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ConnectionError(_))));
}
