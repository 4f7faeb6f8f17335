//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャネル（`PusherChannel`）を管理
//! - 接続へのフレーム送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付とチャネルの生成は UI 層（`ui::handler::websocket`）で行われます。
//! この実装は生成済みの sender を受け取り、エンコード済みフレームを流し込むだけです。
//! 実際のネットワーク書き込みは接続ごとの writer タスクが行うため、
//! ここでの送信はブロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, "{\"type\":\"rooms-list\",\"rooms\":[]}").await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: connection id, Value: 送信チャネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    #[cfg(test)]
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::trace!("Pushed frame to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push frame to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信と、未登録接続のエラー
    // - broadcast: 複数接続への送信と部分失敗の許容
    // - unregister_client: 解除後は届かないこと
    //
    // 【なぜこのテストが必要か】
    // - 受信側が既に切断していても他の接続への配送を止めてはいけない
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 登録済みの接続にフレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("alice"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信は ClientNotFound を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&conn("nobody"), "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: writer 側が終了したチャネルへの送信は PushFailed になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&conn("alice"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が消えていてもブロードキャストは成功し、残りに届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, rx_bob) = mpsc::unbounded_channel();
        let (tx_carol, mut rx_carol) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx_alice).await;
        pusher.register_client(conn("bob"), tx_bob).await;
        pusher.register_client(conn("carol"), tx_carol).await;
        drop(rx_bob);

        // when (操作):
        let targets = vec![conn("alice"), conn("bob"), conn("ghost"), conn("carol")];
        let result = pusher.broadcast(targets, "frame").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx_alice.recv().await, Some("frame".to_string()));
        assert_eq!(rx_carol.recv().await, Some("frame".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_client_is_idempotent() {
        // テスト項目: 登録解除後は送信できず、二重解除してもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;

        // when (操作):
        pusher.unregister_client(&conn("alice")).await;
        pusher.unregister_client(&conn("alice")).await;

        // then (期待する結果):
        assert_eq!(pusher.client_count().await, 0);
        assert!(pusher.push_to(&conn("alice"), "Hello").await.is_err());
    }
}
