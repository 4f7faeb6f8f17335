//! テスト用のヘルパー

use std::sync::Arc;

use roomcast_shared::time::ManualClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, RoomCapacity, RoomRegistry},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    usecase::BroadcastRouter,
};

pub const T0: i64 = 1_700_000_000_000;

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn create_test_repository() -> Arc<InMemoryRoomRepository> {
    create_test_repository_with_max(10)
}

pub fn create_test_repository_with_max(max_players: u32) -> Arc<InMemoryRoomRepository> {
    let registry = RoomRegistry::new(RoomCapacity::new(max_players).unwrap());
    Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(registry))))
}

pub fn create_test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(T0))
}

pub fn create_test_router() -> Arc<BroadcastRouter> {
    Arc::new(BroadcastRouter::new(Arc::new(WebSocketMessagePusher::new())))
}

/// Attach `id` to the router and return the receiving end of its channel
pub async fn attach(
    router: &BroadcastRouter,
    id: &str,
) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    router.attach(conn(id), tx).await;
    rx
}
