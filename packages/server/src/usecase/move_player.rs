//! UseCase: プレイヤー移動処理

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MoveOutcome, Position, RegistryError, RoomId, RoomRepository,
};

/// プレイヤー移動のユースケース
pub struct MovePlayerUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl MovePlayerUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 座標を更新し、通知先（本人以外の同室メンバー）を返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        x: f64,
        y: f64,
    ) -> Result<MoveOutcome, RegistryError> {
        let position = Position::new(x, y)?;
        let outcome = self
            .repository
            .move_player(room_id, connection_id, position)
            .await?;
        tracing::debug!(
            "Player '{}' moved to ({}, {}) in room '{}'",
            connection_id,
            x,
            y,
            room_id
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        CreateRoomUseCase, JoinRoomUseCase,
        testing::{conn, create_test_clock, create_test_repository},
    };

    #[tokio::test]
    async fn test_move_reaches_only_same_room_peers() {
        // テスト項目: 移動の通知先は同じルームの他のメンバーだけ
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let create = CreateRoomUseCase::new(repository.clone(), clock.clone());
        let join = JoinRoomUseCase::new(repository.clone(), clock);
        let algebra = create
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        create
            .execute(conn("dave"), "Geometry".to_string(), "Dave".to_string(), None)
            .await
            .unwrap();
        join.execute(conn("bob"), algebra.id.as_str().to_string(), "Bob".to_string())
            .await
            .unwrap();
        let usecase = MovePlayerUseCase::new(repository.clone());

        // when (操作):
        let outcome = usecase
            .execute(&algebra.id, &conn("alice"), 120.0, 80.5)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.peers, vec![conn("bob")]);
        assert_eq!(outcome.player.position, Position { x: 120.0, y: 80.5 });
    }

    #[tokio::test]
    async fn test_move_with_non_finite_coordinates_is_invalid() {
        // テスト項目: NaN を含む座標は InvalidInput になり、位置は変わらない
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let room = CreateRoomUseCase::new(repository.clone(), create_test_clock())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        let usecase = MovePlayerUseCase::new(repository.clone());

        // when (操作):
        let result = usecase
            .execute(&room.id, &conn("alice"), f64::NAN, 1.0)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
        let stored = repository.get_room(&room.id).await.unwrap();
        assert_eq!(stored.members[0].position, Position::SPAWN);
    }
}
