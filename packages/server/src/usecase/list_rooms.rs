//! UseCase: ルーム一覧・詳細取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository, RoomSummary};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct ListRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl ListRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 作成順のスナップショットを返す
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.repository.list_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let id = RoomId::new(room_id.clone())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id.clone()))?;
        self.repository
            .get_room(&id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound(room_id))
    }
}
