//! UseCase: 入力中通知
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TypingUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 入力中通知が本人に返らず、同じルームの他メンバーにだけ届くことを保証
//! - 通知がアクティビティとして記録され、アイドル掃除の対象から外れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：他メンバーへの通知
//! - 異常系：セッションなし

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, SessionRepository, Timestamp};

use super::{error::TypingError, sequencer::RoomSequencer};

/// 入力中通知のユースケース
pub struct TypingUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<RoomSequencer>,
    clock: Arc<dyn Clock>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<RoomSequencer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
            clock,
        }
    }

    /// 入力中通知を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 通知を送った他メンバーの数
    /// * `Err(TypingError)` - セッションなし・送信失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        typing: bool,
    ) -> Result<usize, TypingError> {
        let now = Timestamp::new(self.clock.now_millis());
        let session = self
            .repository
            .get_current(&connection_id, now)
            .await
            .ok_or(TypingError::SessionNotFound)?;

        let _room_guard = self.sequencer.lock(&session.room).await;
        let others: Vec<ConnectionId> = self
            .repository
            .room_users(&session.room)
            .await
            .iter()
            .map(|s| s.id)
            .filter(|id| id != &connection_id)
            .collect();
        let count = others.len();

        self.message_pusher
            .broadcast(
                others,
                &OutboundEvent::Typing {
                    username: session.username,
                    typing,
                },
            )
            .await
            .map_err(|e| TypingError::BroadcastFailed(e.to_string()))?;

        Ok(count)
    }
}
