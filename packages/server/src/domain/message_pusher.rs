//! MessagePusher trait 定義
//!
//! 接続中のクライアントへフレームを届けるためのインターフェース。
//! WebSocket などの具体的な送信手段は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// Outbound channel of one connection (encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Start routing frames for `connection_id` into `sender`
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Stop routing frames for `connection_id`; unknown ids are ignored
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Push one frame to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push one frame to each target in order, tolerating individual failures
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
