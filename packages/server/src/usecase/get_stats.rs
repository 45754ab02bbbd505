//! UseCase: サーバー全体の統計の取得

use std::sync::Arc;

use crate::domain::{SessionRepository, TotalStats};

/// 全体統計取得のユースケース
pub struct GetStatsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetStatsUseCase {
    /// 新しい GetStatsUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> TotalStats {
        self.repository.total_stats().await
    }
}
