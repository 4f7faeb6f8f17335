//! UseCase: 接続受付処理
//!
//! 新しい接続に ID を割り当て、送信チャネルを Broadcast Router に登録します。
//! この時点ではどのルームにも属しません。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionIdFactory, PusherChannel, ValueObjectError};

use super::BroadcastRouter;

/// 接続受付のユースケース
pub struct ConnectConnectionUseCase {
    router: Arc<BroadcastRouter>,
}

impl ConnectConnectionUseCase {
    pub fn new(router: Arc<BroadcastRouter>) -> Self {
        Self { router }
    }

    /// 接続 ID を発行して送信チャネルを登録する
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, ValueObjectError> {
        let connection_id = ConnectionIdFactory::generate()?;
        self.router.attach(connection_id.clone(), sender).await;
        tracing::info!("Connection '{}' accepted", connection_id);
        Ok(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::testing::create_test_router;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_assigns_distinct_ids_and_registers() {
        // テスト項目: 接続ごとに異なる ID が発行され、その ID 宛てのフレームが届く
        // given (前提条件):
        let router = create_test_router();
        let usecase = ConnectConnectionUseCase::new(router.clone());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(tx1).await.unwrap();
        let second = usecase.execute(tx2).await.unwrap();
        router.send_to(&first, "hello").await;

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(rx1.recv().await, Some("hello".to_string()));
    }
}
