//! Shared application state.

use std::{sync::Arc, time::Instant};

use chrono::FixedOffset;

use crate::usecase::{ConnectionUseCases, GetRoomDetailUseCase, GetRoomsUseCase, GetStatsUseCase};

/// Shared application state
pub struct AppState {
    /// 接続ごとの状態機械が使うユースケース一式
    pub connection_usecases: ConnectionUseCases,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetStatsUseCase（全体統計取得のユースケース）
    pub get_stats_usecase: Arc<GetStatsUseCase>,
    /// Offset for timestamps in HTTP responses
    pub utc_offset: FixedOffset,
    pub started_at: Instant,
}

impl AppState {
    /// Seconds since the server started
    pub fn uptime(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
