//! UseCase: ルーム詳細（統計とメンバー）の取得
//!
//! 一度も参加のないルームは RoomNotFound になります。
//! 全員が退出したルームも、統計はプロセスの寿命の間保持されます。

use std::sync::Arc;

use crate::domain::{RoomDirectory, RoomName, RoomStats, Session, SessionRepository};

use super::error::GetRoomDetailError;

/// ルームの統計と現在のメンバー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub name: RoomName,
    pub stats: RoomStats,
    pub users: Vec<Session>,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn SessionRepository>,
    room_directory: Arc<dyn RoomDirectory>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        room_directory: Arc<dyn RoomDirectory>,
    ) -> Self {
        Self {
            repository,
            room_directory,
        }
    }

    pub async fn execute(&self, room: &str) -> Result<RoomDetail, GetRoomDetailError> {
        let name = RoomName::new(room)?;
        let stats = self
            .room_directory
            .stats(&name)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let users = self.repository.room_users(&name).await;

        Ok(RoomDetail { name, stats, users })
    }
}
