//! Idle Reaper
//!
//! A periodic task that queues sweeps through the gateway. It never touches
//! the registry itself, so sweeps are ordered with every other mutation.

use std::time::Duration;

use thiserror::Error;
use tokio::{sync::oneshot, task::JoinHandle};

use super::gateway::GatewayHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaperError {
    #[error("reaper interval must be greater than zero")]
    ZeroInterval,
}

pub struct IdleReaper {
    gateway: GatewayHandle,
    interval: Duration,
}

/// Running reaper; stop it with [`ReaperHandle::stop`]
pub struct ReaperHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl IdleReaper {
    pub fn new(gateway: GatewayHandle, interval: Duration) -> Result<Self, ReaperError> {
        if interval.is_zero() {
            return Err(ReaperError::ZeroInterval);
        }
        Ok(Self { gateway, interval })
    }

    pub fn start(self) -> ReaperHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            tracing::info!("Idle reaper started (interval {:?})", self.interval);
            let mut ticker = tokio::time::interval(self.interval);
            // the first tick fires immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        match self.gateway.sweep().await {
                            Ok(0) => tracing::debug!("Idle sweep removed no rooms"),
                            Ok(removed) => tracing::info!("Idle sweep removed {} room(s)", removed),
                            Err(e) => {
                                tracing::warn!("Idle reaper stopping: {}", e);
                                break;
                            }
                        }
                    }
                }
            }
            tracing::info!("Idle reaper stopped");
        });
        ReaperHandle { stop_tx, task }
    }
}

impl ReaperHandle {
    /// Stop the timer and wait for the task to finish
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Idle reaper task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use roomcast_shared::time::ManualClock;
    use tokio::sync::{Mutex, mpsc};

    use super::*;
    use crate::{
        domain::{RoomCapacity, RoomRegistry, RoomRepository},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
        infrastructure::dto::websocket::{ClientFrame, ServerFrame},
        ui::gateway::Gateway,
        usecase::BroadcastRouter,
    };

    #[tokio::test]
    async fn test_reaper_sweeps_periodically_and_stops() {
        // テスト項目: 期限切れのルームが次の tick で回収され、stop で確実に終了する
        // given (前提条件):
        let registry = RoomRegistry::new(RoomCapacity::new(10).unwrap());
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(registry))));
        let router = Arc::new(BroadcastRouter::new(Arc::new(WebSocketMessagePusher::new())));
        let clock = Arc::new(ManualClock::new(0));
        let (gateway, gateway_task) = Gateway::new(
            repository.clone(),
            router,
            clock.clone(),
            Duration::from_millis(1_000),
        )
        .spawn();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = gateway.connect(tx).await.unwrap();
        let create = ClientFrame::CreateRoom {
            room_name: "Algebra".to_string(),
            player_name: "Alice".to_string(),
            max_players: None,
        };
        gateway.inbound(alice, create.encode().unwrap()).unwrap();
        // connected, room-created
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        clock.advance(1_001);

        // when (操作):
        let reaper = IdleReaper::new(gateway.clone(), Duration::from_millis(20))
            .unwrap()
            .start();
        let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        reaper.stop().await;

        // then (期待する結果):
        assert!(matches!(
            ServerFrame::decode(&closed).unwrap(),
            ServerFrame::RoomClosed { .. }
        ));
        assert!(repository.list_rooms().await.is_empty());

        gateway.stop().unwrap();
        gateway_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_reaper_stops_when_gateway_is_gone() {
        // テスト項目: Gateway が停止していると reaper は自ら終了する
        // given (前提条件):
        let registry = RoomRegistry::default();
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(registry))));
        let router = Arc::new(BroadcastRouter::new(Arc::new(WebSocketMessagePusher::new())));
        let (gateway, gateway_task) = Gateway::new(
            repository,
            router,
            Arc::new(ManualClock::new(0)),
            Duration::from_millis(1_000),
        )
        .spawn();
        gateway.stop().unwrap();
        gateway_task.await.unwrap();

        // when (操作):
        let reaper = IdleReaper::new(gateway, Duration::from_millis(10))
            .unwrap()
            .start();
        let finished = tokio::time::timeout(Duration::from_secs(5), reaper.task).await;

        // then (期待する結果):
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        // テスト項目: 間隔 0 の reaper は起動前に拒否される
        // given (前提条件):
        let registry = RoomRegistry::default();
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(registry))));
        let router = Arc::new(BroadcastRouter::new(Arc::new(WebSocketMessagePusher::new())));
        let (gateway, gateway_task) = Gateway::new(
            repository,
            router,
            Arc::new(ManualClock::new(0)),
            Duration::from_millis(1_000),
        )
        .spawn();

        // when (操作):
        let result = IdleReaper::new(gateway.clone(), Duration::ZERO);

        // then (期待する結果):
        assert_eq!(result.err(), Some(ReaperError::ZeroInterval));

        gateway.stop().unwrap();
        gateway_task.await.unwrap();
    }
}
