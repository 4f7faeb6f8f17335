//! UseCase: チャット送信処理
//!
//! 送信者がルームのメンバーであることを確認し、配送先（送信者を含む全員）と
//! 送信時刻を返します。メッセージ履歴は保持しません。

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ChatContent, ConnectionId, Player, RegistryError, RoomId, RoomRepository, Timestamp,
};

/// 配送準備の整ったチャットメッセージ
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPosted {
    pub sender: Player,
    pub content: ChatContent,
    pub sent_at: Timestamp,
    /// Every member of the room, sender included
    pub members: Vec<ConnectionId>,
}

/// チャット送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl SendChatUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        content: String,
    ) -> Result<ChatPosted, RegistryError> {
        let content = ChatContent::new(content)?;
        let context = self.repository.find_member(room_id, connection_id).await?;
        let sent_at = Timestamp::new(self.clock.now_millis());
        tracing::debug!(
            "Chat from '{}' in room '{}' ({} chars)",
            connection_id,
            room_id,
            content.as_str().chars().count()
        );
        Ok(ChatPosted {
            sender: context.player,
            content,
            sent_at,
            members: context.members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        CreateRoomUseCase, JoinRoomUseCase,
        testing::{T0, conn, create_test_clock, create_test_repository},
    };

    #[tokio::test]
    async fn test_chat_is_addressed_to_whole_room() {
        // テスト項目: チャットの配送先は送信者を含むルームの全メンバー
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let room = CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        JoinRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("bob"), room.id.as_str().to_string(), "Bob".to_string())
            .await
            .unwrap();
        clock.advance(250);
        let usecase = SendChatUseCase::new(repository, clock);

        // when (操作):
        let posted = usecase
            .execute(&room.id, &conn("bob"), "hi all".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(posted.members, vec![conn("alice"), conn("bob")]);
        assert_eq!(posted.sender.name.as_str(), "Bob");
        assert_eq!(posted.content.as_str(), "hi all");
        assert_eq!(posted.sent_at, Timestamp::new(T0 + 250));
    }

    #[tokio::test]
    async fn test_chat_from_non_member_is_rejected() {
        // テスト項目: メンバーでない接続からのチャットは PlayerNotFound になる
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let room = CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        let usecase = SendChatUseCase::new(repository, clock);

        // when (操作):
        let result = usecase
            .execute(&room.id, &conn("mallory"), "hello".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RegistryError::PlayerNotFound("mallory".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_chat_is_invalid() {
        // テスト項目: 空白のみのチャットは InvalidInput になる
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = create_test_repository();
        let clock = create_test_clock();
        let room = CreateRoomUseCase::new(repository.clone(), clock.clone())
            .execute(conn("alice"), "Algebra".to_string(), "Alice".to_string(), None)
            .await
            .unwrap();
        let usecase = SendChatUseCase::new(repository, clock);

        // when (操作):
        let result = usecase.execute(&room.id, &conn("alice"), "  ".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
    }
}
