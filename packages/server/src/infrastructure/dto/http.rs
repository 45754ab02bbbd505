//! HTTP API response DTOs.
//!
//! Timestamps are RFC 3339 strings in the server's configured offset.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDto {
    pub status: String,
    /// Seconds since the server started
    pub uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUserDto {
    pub username: String,
    pub joined_at: String,
    pub last_active: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub name: String,
    pub user_count: usize,
    pub users: Vec<RoomUserDto>,
    pub created: String,
    pub last_activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub name: String,
    pub created: String,
    pub total_messages: u64,
    pub peak_users: usize,
    pub users: Vec<RoomUserDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatsDto {
    pub total_users: usize,
    pub total_rooms: usize,
    pub active_rooms: usize,
    pub uptime: f64,
}
