//! Domain entities.

use std::time::Duration;

use super::value_object::{ConnectionId, RoomName, Timestamp, Username};

/// Server-side record binding a live connection to a username and room.
///
/// `room` never changes after creation; rejoining means a new session after a leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: ConnectionId,
    pub username: Username,
    pub room: RoomName,
    pub joined_at: Timestamp,
    pub last_active_at: Timestamp,
    /// Last accepted chat message, used by the rate-limit policy
    pub last_message_at: Option<Timestamp>,
}

impl Session {
    pub fn new(id: ConnectionId, username: Username, room: RoomName, now: Timestamp) -> Self {
        Self {
            id,
            username,
            room,
            joined_at: now,
            last_active_at: now,
            last_message_at: None,
        }
    }

    /// Record activity. Time never moves backwards for a session.
    pub fn touch(&mut self, now: Timestamp) {
        if now > self.last_active_at {
            self.last_active_at = now;
        }
    }

    /// `true` when the last activity is strictly older than `now - max_idle`
    pub fn is_idle(&self, max_idle: Duration, now: Timestamp) -> bool {
        let max_idle_ms = i64::try_from(max_idle.as_millis()).unwrap_or(i64::MAX);
        now.millis_since(self.last_active_at) > max_idle_ms
    }
}

/// Monotonic per-room counters, kept for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
    /// First-ever join into the room
    pub created: Timestamp,
    pub total_messages: u64,
    /// High-water mark of concurrent members
    pub peak_users: usize,
}

impl RoomStats {
    pub fn new(created: Timestamp) -> Self {
        Self {
            created,
            total_messages: 0,
            peak_users: 0,
        }
    }

    pub fn observe_members(&mut self, current: usize) {
        self.peak_users = self.peak_users.max(current);
    }
}

/// Diagnostic snapshot of one occupied room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub name: RoomName,
    pub user_count: usize,
    pub users: Vec<Session>,
    pub created: Timestamp,
    /// Newest `last_active_at` among current members
    pub last_activity: Timestamp,
}

/// Process-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TotalStats {
    pub total_users: usize,
    /// Every room ever joined
    pub total_rooms: usize,
    /// Rooms with at least one current member
    pub active_rooms: usize,
}

/// Wire-ready chat or system message. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: String,
    pub text: String,
    pub time: String,
}

/// Per-connection protocol state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined { room: RoomName },
    Closed,
}
