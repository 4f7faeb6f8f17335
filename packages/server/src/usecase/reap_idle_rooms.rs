//! UseCase: アイドルルームの回収処理
//!
//! 空のルームと、作成から `idle_timeout` を超えて経過したルームを
//! メンバーの有無にかかわらず削除します。判定は sweep の時点でのみ行われます。

use std::{sync::Arc, time::Duration};

use roomcast_shared::time::Clock;

use crate::domain::{Room, RoomRepository, Timestamp};

/// アイドルルーム回収のユースケース
pub struct ReapIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    idle_timeout: Duration,
}

impl ReapIdleRoomsUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            idle_timeout,
        }
    }

    /// 削除したルームを、削除時点のメンバーごと返す
    pub async fn execute(&self) -> Vec<Room> {
        let now = Timestamp::new(self.clock.now_millis());
        let timeout_millis = i64::try_from(self.idle_timeout.as_millis()).unwrap_or(i64::MAX);
        let removed = self.repository.sweep_expired(now, timeout_millis).await;
        for room in &removed {
            tracing::info!(
                "Reaped room '{}' ({}) with {} member(s), age {} ms",
                room.id,
                room.name.as_str(),
                room.member_count(),
                room.created_at.elapsed_until(now)
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        CreateRoomUseCase,
        testing::{conn, create_test_clock, create_test_repository},
    };

    const TIMEOUT_MS: u64 = 60_000;

    #[tokio::test]
    async fn test_sweep_boundary() {
        // テスト項目: timeout ちょうどでは残り、1ms 超えると削除される
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let room = CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        let usecase = ReapIdleRoomsUseCase::new(
            repository.clone(),
            clock.clone(),
            Duration::from_millis(TIMEOUT_MS),
        );

        // when (操作):
        clock.advance(TIMEOUT_MS as i64 - 1);
        let before = usecase.execute().await;
        clock.advance(1);
        let at = usecase.execute().await;
        clock.advance(1);
        let after = usecase.execute().await;

        // then (期待する結果):
        assert!(before.is_empty());
        assert!(at.is_empty());
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, room.id);
        assert_eq!(after[0].member_ids(), vec![conn("alice")]);
        assert!(repository.list_rooms().await.is_empty());
        assert_eq!(repository.room_of(&conn("alice")).await, None);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        // テスト項目: 同じ時刻で 2 回 sweep しても 2 回目は何も削除しない
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        let usecase = ReapIdleRoomsUseCase::new(
            repository.clone(),
            clock.clone(),
            Duration::from_millis(TIMEOUT_MS),
        );
        clock.advance(TIMEOUT_MS as i64 + 1);

        // when (操作):
        let first = usecase.execute().await;
        let second = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
