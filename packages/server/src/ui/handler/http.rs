//! HTTP diagnostics endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        conversion::{room_detail_to_dto, room_summary_to_dto, total_stats_to_dto},
        http::{HealthDto, RoomDetailDto, RoomSummaryDto, TotalStatsDto},
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        uptime: state.uptime(),
    })
}

/// List occupied rooms, ordered by name
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries = rooms
        .values()
        .map(|summary| room_summary_to_dto(summary, state.utc_offset))
        .collect();

    Json(summaries)
}

/// Counters and current members of one room
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room).await {
        Ok(detail) => Ok(Json(room_detail_to_dto(
            detail.name.as_str(),
            &detail.stats,
            &detail.users,
            state.utc_offset,
        ))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::InvalidRoomName(e)) => {
            tracing::debug!("Rejected room detail request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Process-wide counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<TotalStatsDto> {
    let stats = state.get_stats_usecase.execute().await;
    Json(total_stats_to_dto(&stats, state.uptime()))
}
