//! UseCase: 接続切断処理
//!
//! 切断時のクリーンアップは寛容で冪等です。ルームに属していない接続や
//! 既に片付け済みの接続に対して呼んでもエラーにはなりません。

use std::sync::Arc;

use crate::domain::{ConnectionId, Removal, RoomRepository};

use super::BroadcastRouter;

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
}

impl DisconnectConnectionUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, router: Arc<BroadcastRouter>) -> Self {
        Self { repository, router }
    }

    /// 接続をルームから外し、送信チャネルの登録を解除する
    ///
    /// ルームにいた場合は `Removal`（player-left の通知先を含む）を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Removal> {
        self.router.detach(connection_id).await;

        let removal = self.repository.remove_connection(connection_id).await;
        match &removal {
            Some(removal) => {
                tracing::info!(
                    "Connection '{}' disconnected; removed '{}' from room '{}'",
                    connection_id,
                    removal.player.name.as_str(),
                    removal.player.room_id
                );
                if removal.room_now_empty {
                    tracing::info!(
                        "Room '{}' closed (no members left)",
                        removal.player.room_id
                    );
                }
            }
            None => tracing::info!("Connection '{}' disconnected", connection_id),
        }
        removal
    }
}
