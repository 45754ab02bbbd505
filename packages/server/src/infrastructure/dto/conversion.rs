//! Conversion logic between DTOs and domain entities.

use chrono::FixedOffset;
use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{InboundEvent, OutboundEvent, RoomStats, RoomSummary, Session, TotalStats};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientEvent> for InboundEvent {
    fn from(event: dto::ClientEvent) -> Self {
        match event {
            dto::ClientEvent::JoinRoom(payload) => Self::Join {
                username: payload.username,
                room: payload.room,
            },
            dto::ClientEvent::ChatMessage(text) => Self::ChatMessage(text),
            dto::ClientEvent::Typing(payload) => Self::Typing(payload.typing),
        }
    }
}

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<&Session> for dto::RoomUserInfo {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.to_string(),
            username: session.username.as_str().to_string(),
            joined_at: session.joined_at.value(),
            last_active: session.last_active_at.value(),
        }
    }
}

impl From<&OutboundEvent> for dto::ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Message(message) => Self::Message(dto::MessagePayload {
                username: message.username.clone(),
                text: message.text.clone(),
                time: message.time.clone(),
            }),
            OutboundEvent::RoomUsers { room, users } => Self::RoomUsers(dto::RoomUsersPayload {
                room: room.as_str().to_string(),
                users: users.iter().map(dto::RoomUserInfo::from).collect(),
            }),
            OutboundEvent::Typing { username, typing } => {
                Self::Typing(dto::TypingStatusPayload {
                    username: username.as_str().to_string(),
                    typing: *typing,
                })
            }
            OutboundEvent::UserJoined { username, room } => {
                Self::UserJoined(dto::PresencePayload {
                    username: username.as_str().to_string(),
                    room: room.as_str().to_string(),
                })
            }
            OutboundEvent::UserLeft { username, room } => Self::UserLeft(dto::PresencePayload {
                username: username.as_str().to_string(),
                room: room.as_str().to_string(),
            }),
            OutboundEvent::Error { message } => Self::Error(dto::ErrorPayload {
                message: message.clone(),
            }),
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

pub fn room_user_to_dto(session: &Session, offset: FixedOffset) -> http::RoomUserDto {
    http::RoomUserDto {
        username: session.username.as_str().to_string(),
        joined_at: timestamp_to_rfc3339(session.joined_at.value(), offset),
        last_active: timestamp_to_rfc3339(session.last_active_at.value(), offset),
    }
}

pub fn room_summary_to_dto(summary: &RoomSummary, offset: FixedOffset) -> http::RoomSummaryDto {
    http::RoomSummaryDto {
        name: summary.name.as_str().to_string(),
        user_count: summary.user_count,
        users: summary
            .users
            .iter()
            .map(|s| room_user_to_dto(s, offset))
            .collect(),
        created: timestamp_to_rfc3339(summary.created.value(), offset),
        last_activity: timestamp_to_rfc3339(summary.last_activity.value(), offset),
    }
}

pub fn room_detail_to_dto(
    name: &str,
    stats: &RoomStats,
    users: &[Session],
    offset: FixedOffset,
) -> http::RoomDetailDto {
    http::RoomDetailDto {
        name: name.to_string(),
        created: timestamp_to_rfc3339(stats.created.value(), offset),
        total_messages: stats.total_messages,
        peak_users: stats.peak_users,
        users: users.iter().map(|s| room_user_to_dto(s, offset)).collect(),
    }
}

pub fn total_stats_to_dto(stats: &TotalStats, uptime: f64) -> http::TotalStatsDto {
    http::TotalStatsDto {
        total_users: stats.total_users,
        total_rooms: stats.total_rooms,
        active_rooms: stats.active_rooms,
        uptime,
    }
}
