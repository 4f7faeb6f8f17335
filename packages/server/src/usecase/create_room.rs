//! UseCase: ルーム作成処理
//!
//! ルームを登録し、作成者を最初のメンバーとして追加します。
//! 作成者の追加に失敗した場合ルームは残りません。

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{ConnectionId, RegistryError, Room, RoomRepository, Timestamp};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `host` - 作成者の接続 ID
    /// * `room_name` - ルームの表示名（未検証）
    /// * `player_name` - 作成者の表示名（未検証）
    /// * `max_players` - 容量。省略時は設定上の上限
    pub async fn execute(
        &self,
        host: ConnectionId,
        room_name: String,
        player_name: String,
        max_players: Option<u32>,
    ) -> Result<Room, RegistryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let room = self
            .repository
            .open_room(room_name, max_players, host, player_name, now)
            .await?;
        tracing::info!(
            "Room '{}' ({}) created with capacity {}",
            room.id,
            room.name.as_str(),
            room.capacity.value()
        );
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::testing::{T0, conn, create_test_clock, create_test_repository};

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: ルームが作成され、作成者が唯一のメンバーになる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CreateRoomUseCase::new(repository.clone(), create_test_clock());

        // when (操作):
        let room = usecase
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), Some(4))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.name.as_str(), "Algebra");
        assert_eq!(room.capacity.value(), 4);
        assert_eq!(room.created_at, Timestamp::new(T0));
        assert_eq!(room.member_ids(), vec![conn("alice")]);
        assert_eq!(repository.list_rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_room_with_empty_name_has_no_side_effect() {
        // テスト項目: 空のルーム名では InvalidInput になり、ルームも登録されない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CreateRoomUseCase::new(repository.clone(), create_test_clock());

        // when (操作):
        let result = usecase
            .execute(conn("alice"), "".to_string(), "Alice".to_string(), None)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
        assert!(repository.list_rooms().await.is_empty());
        assert_eq!(repository.room_of(&conn("alice")).await, None);
    }

    #[tokio::test]
    async fn test_create_room_with_zero_capacity_fails() {
        // テスト項目: 容量 0 の指定は InvalidInput になる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CreateRoomUseCase::new(repository.clone(), create_test_clock());

        // when (操作):
        let result = usecase
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), Some(0))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
        assert!(repository.list_rooms().await.is_empty());
    }
}
