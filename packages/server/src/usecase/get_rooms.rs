//! UseCase: ルーム一覧の取得

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{RoomName, RoomSummary, SessionRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// メンバーのいるルームの一覧をルーム名順で返す
    pub async fn execute(&self) -> BTreeMap<RoomName, RoomSummary> {
        self.repository.all_rooms_summary().await
    }
}
