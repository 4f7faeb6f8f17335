//! Broadcast Router
//!
//! エンコード済みのフレームをルームの現在のメンバーへ配送します。
//! 配送は best-effort で、消えた接続への失敗はログに残して握りつぶします。
//! 配送順は呼び出し順（= Gateway のコマンド処理順）に従います。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// Which members of a room receive a broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    AllExcept(ConnectionId),
}

impl Audience {
    fn includes(&self, member: &ConnectionId) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::AllExcept(excluded) => member != excluded,
        }
    }
}

pub struct BroadcastRouter {
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastRouter {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Start delivering frames for `connection_id` into `sender`
    pub async fn attach(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
    }

    pub async fn detach(&self, connection_id: &ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
    }

    /// Deliver a frame to a single connection
    pub async fn send_to(&self, connection_id: &ConnectionId, frame: &str) {
        if let Err(e) = self.message_pusher.push_to(connection_id, frame).await {
            tracing::warn!("Dropped frame for connection '{}': {}", connection_id, e);
        }
    }

    /// Deliver a frame to `members` filtered by `audience`
    pub async fn to_room(&self, members: &[ConnectionId], audience: Audience, frame: &str) {
        let targets: Vec<ConnectionId> = members
            .iter()
            .filter(|member| audience.includes(member))
            .cloned()
            .collect();
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.message_pusher.broadcast(targets, frame).await {
            tracing::warn!("Room broadcast failed: {}", e);
        }
    }
}
