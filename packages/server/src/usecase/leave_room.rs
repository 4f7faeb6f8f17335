//! UseCase: ルーム退出処理
//!
//! 最後のメンバーが退出したルームはその場で削除されます。

use std::sync::Arc;

use crate::domain::{ConnectionId, RegistryError, Removal, RoomId, RoomRepository};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 退出を実行し、残りのメンバー（player-left の通知先）を返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Removal, RegistryError> {
        let removal = self.repository.leave_room(room_id, connection_id).await?;
        tracing::info!(
            "Player '{}' ({}) left room '{}'",
            removal.player.name.as_str(),
            connection_id,
            room_id
        );
        if removal.room_now_empty {
            tracing::info!("Room '{}' closed (no members left)", room_id);
        }
        Ok(removal)
    }
}
