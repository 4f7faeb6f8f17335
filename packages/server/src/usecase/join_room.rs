//! UseCase: ルーム参加処理

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{ConnectionId, JoinOutcome, RegistryError, RoomId, RoomRepository, Timestamp};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ルーム参加を実行
    ///
    /// 返される `JoinOutcome::peers` は参加者本人を除いた既存メンバーで、
    /// player-joined の通知先になります。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: String,
        player_name: String,
    ) -> Result<JoinOutcome, RegistryError> {
        let room_id = RoomId::new(room_id)?;
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = self
            .repository
            .join_room(&room_id, connection_id, player_name, now)
            .await?;
        tracing::info!(
            "Player '{}' ({}) joined room '{}' ({}/{})",
            outcome.player.name.as_str(),
            outcome.player.id,
            room_id,
            outcome.room.member_count(),
            outcome.room.capacity.value()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        CreateRoomUseCase,
        testing::{conn, create_test_clock, create_test_repository},
    };

    async fn setup(capacity: u32) -> (JoinRoomUseCase, Arc<dyn RoomRepository>, RoomId) {
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let room = CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(
                conn("alice"),
                "Algebra".to_string(),
                "Alice".to_string(),
                Some(capacity),
            )
            .await
            .unwrap();
        (
            JoinRoomUseCase::new(repository.clone(), clock),
            repository,
            room.id,
        )
    }

    #[tokio::test]
    async fn test_join_room_returns_peers() {
        // テスト項目: 参加に成功し、通知先として既存メンバーが返される
        // given (前提条件):
        let (usecase, _repository, room_id) = setup(4).await;

        // when (操作):
        let outcome = usecase
            .execute(conn("bob"), room_id.as_str().to_string(), "Bob".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.peers, vec![conn("alice")]);
        assert_eq!(outcome.room.member_ids(), vec![conn("alice"), conn("bob")]);
    }

    #[tokio::test]
    async fn test_join_at_capacity_minus_one_succeeds_then_full() {
        // テスト項目: 残り 1 枠なら参加でき、満員になった後の参加は RoomFull になる
        // given (前提条件):
        let (usecase, repository, room_id) = setup(2).await;

        // when (操作):
        let second = usecase
            .execute(conn("bob"), room_id.as_str().to_string(), "Bob".to_string())
            .await;
        let third = usecase
            .execute(conn("carol"), room_id.as_str().to_string(), "Carol".to_string())
            .await;

        // then (期待する結果):
        assert!(second.is_ok());
        assert_eq!(third, Err(RegistryError::RoomFull(room_id.as_str().to_string())));
        assert_eq!(repository.get_room(&room_id).await.unwrap().member_count(), 2);
        assert_eq!(repository.room_of(&conn("carol")).await, None);
    }

    #[tokio::test]
    async fn test_join_unknown_room() {
        // テスト項目: 存在しないルームへの参加は RoomNotFound になる
        // given (前提条件):
        let (usecase, _repository, _room_id) = setup(4).await;

        // when (操作):
        let result = usecase
            .execute(conn("bob"), "no-such-room".to_string(), "Bob".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RegistryError::RoomNotFound("no-such-room".to_string()))
        );
    }

    #[tokio::test]
    async fn test_join_with_blank_name_is_invalid() {
        // テスト項目: 空白のみの表示名での参加は InvalidInput になる
        // given (前提条件):
        let (usecase, _repository, room_id) = setup(4).await;

        // when (操作):
        let result = usecase
            .execute(conn("bob"), room_id.as_str().to_string(), "   ".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
    }
}
