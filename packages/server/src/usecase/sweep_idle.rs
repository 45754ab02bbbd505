//! UseCase: アイドルセッションの掃除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SweepIdleUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 閾値を超えて無操作のセッションだけが削除されることを保証
//! - 削除ごとに通常の退出と同じ通知が行われることを確認
//! - 1 件の通知失敗が他のセッションの処理を止めないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：アイドルとアクティブが混在するルーム
//! - 異常系：MessagePusher が失敗する場合（mockall で再現）

use std::{sync::Arc, time::Duration};

use hiroba_shared::time::Clock;

use crate::domain::{SessionRepository, Timestamp};

use super::{notifier::RoomNotifier, sequencer::RoomSequencer};

/// アイドルセッション掃除のユースケース
pub struct SweepIdleUseCase {
    repository: Arc<dyn SessionRepository>,
    notifier: Arc<RoomNotifier>,
    sequencer: Arc<RoomSequencer>,
    clock: Arc<dyn Clock>,
    idle_timeout: Duration,
}

impl SweepIdleUseCase {
    /// 新しい SweepIdleUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        notifier: Arc<RoomNotifier>,
        sequencer: Arc<RoomSequencer>,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            notifier,
            sequencer,
            clock,
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// 掃除を実行し、削除したセッション数を返す
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let swept = self.repository.sweep_idle(self.idle_timeout, now).await;

        for session in &swept {
            let _room_guard = self.sequencer.lock(&session.room).await;
            tracing::info!(
                "Swept idle session '{}' ({}) from room '{}'",
                session.username,
                session.id,
                session.room
            );
            if let Err(e) = self.notifier.announce_departure(session, now).await {
                tracing::warn!(
                    "Failed to broadcast departure of idle '{}': {}",
                    session.username,
                    e
                );
            }
        }

        if !swept.is_empty() {
            tracing::info!("Idle sweep removed {} sessions", swept.len());
        }
        swept.len()
    }
}
