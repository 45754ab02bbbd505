//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断時にセッションが確実に 1 回だけ解放されることを保証
//! - 残ったメンバーに退出通知と最新のロスターが届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の接続の退出
//! - エッジケース：2 回目の退出、参加していない接続の退出

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ConnectionId, RoomName, Session, SessionRepository, Timestamp};

use super::{notifier::RoomNotifier, sequencer::RoomSequencer};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn SessionRepository>,
    notifier: Arc<RoomNotifier>,
    sequencer: Arc<RoomSequencer>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        notifier: Arc<RoomNotifier>,
        sequencer: Arc<RoomSequencer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            sequencer,
            clock,
        }
    }

    /// ルーム退出を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 退出する接続の ID
    /// * `room` - 接続が参加していたルーム（ロックの取得に使う）
    ///
    /// # Returns
    ///
    /// * `Some(Session)` - 解放されたセッション
    /// * `None` - 既に解放済み（掃除済みを含む）
    pub async fn execute(&self, connection_id: &ConnectionId, room: &RoomName) -> Option<Session> {
        let _room_guard = self.sequencer.lock(room).await;
        let session = self.repository.leave(connection_id).await?;
        tracing::info!(
            "'{}' left room '{}' (connection '{}')",
            session.username,
            session.room,
            connection_id
        );

        let now = Timestamp::new(self.clock.now_millis());
        if let Err(e) = self.notifier.announce_departure(&session, now).await {
            tracing::warn!(
                "Failed to broadcast departure of '{}': {}",
                session.username,
                e
            );
        }

        Some(session)
    }
}
