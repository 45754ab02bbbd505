//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository / RoomDirectory trait の具体的な実装。
//! セッション一覧とルーム統計を 1 つの Mutex で保護し、
//! セッションの変更とカウンタの更新を同じクリティカルセクションで行います。

use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, RateLimitPolicy, RepositoryError, RoomDirectory, RoomName, RoomStats,
    RoomSummary, Session, SessionRepository, Timestamp, TotalStats, Username,
};

/// ロックの内側にある状態
///
/// セッションは参加順に保持する（ロスターの順序になる）。
#[derive(Debug, Default)]
struct RegistryState {
    sessions: Vec<Session>,
    rooms: HashMap<RoomName, RoomStats>,
}

impl RegistryState {
    fn position(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.sessions.iter().position(|s| &s.id == connection_id)
    }

    fn count_members(&self, room: &RoomName) -> usize {
        self.sessions.iter().filter(|s| &s.room == room).count()
    }

    fn join(&mut self, session: Session) -> Session {
        if let Some(index) = self.position(&session.id) {
            tracing::warn!(
                "Connection '{}' already had a session in '{}', replacing it",
                session.id,
                self.sessions[index].room
            );
            self.sessions.remove(index);
        }

        let room = session.room.clone();
        let created = session.joined_at;
        self.sessions.push(session.clone());

        let members = self.count_members(&room);
        self.rooms
            .entry(room)
            .or_insert_with(|| RoomStats::new(created))
            .observe_members(members);

        session
    }

    fn leave(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        let index = self.position(connection_id)?;
        Some(self.sessions.remove(index))
    }

    fn summary(&self) -> BTreeMap<RoomName, RoomSummary> {
        let mut summaries: BTreeMap<RoomName, RoomSummary> = BTreeMap::new();

        for session in &self.sessions {
            let summary = summaries
                .entry(session.room.clone())
                .or_insert_with(|| RoomSummary {
                    name: session.room.clone(),
                    user_count: 0,
                    users: Vec::new(),
                    created: self
                        .rooms
                        .get(&session.room)
                        .map(|stats| stats.created)
                        .unwrap_or(session.joined_at),
                    last_activity: session.last_active_at,
                });

            summary.user_count += 1;
            summary.users.push(session.clone());
            summary.last_activity = summary.last_activity.max(session.last_active_at);
        }

        summaries
    }
}

/// インメモリ Session Repository 実装
///
/// Session Registry と Room Directory の両方の trait を実装します。
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    state: Mutex<RegistryState>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn join(
        &self,
        connection_id: ConnectionId,
        username: Username,
        room: RoomName,
        now: Timestamp,
    ) -> Session {
        let session = Session::new(connection_id, username, room, now);
        let mut state = self.state.lock().await;
        let session = state.join(session);
        tracing::debug!("Session '{}' joined '{}'", session.id, session.room);
        session
    }

    async fn get_current(&self, connection_id: &ConnectionId, now: Timestamp) -> Option<Session> {
        let mut state = self.state.lock().await;
        let index = state.position(connection_id)?;
        let session = &mut state.sessions[index];
        session.touch(now);
        Some(session.clone())
    }

    async fn leave(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut state = self.state.lock().await;
        let session = state.leave(connection_id);
        if let Some(session) = &session {
            tracing::debug!("Session '{}' left '{}'", session.id, session.room);
        }
        session
    }

    async fn room_users(&self, room: &RoomName) -> Vec<Session> {
        let state = self.state.lock().await;
        state
            .sessions
            .iter()
            .filter(|s| &s.room == room)
            .cloned()
            .collect()
    }

    async fn all_rooms_summary(&self) -> BTreeMap<RoomName, RoomSummary> {
        let state = self.state.lock().await;
        state.summary()
    }

    async fn sweep_idle(&self, max_idle: Duration, now: Timestamp) -> Vec<Session> {
        let mut state = self.state.lock().await;
        let (idle, active): (Vec<Session>, Vec<Session>) = std::mem::take(&mut state.sessions)
            .into_iter()
            .partition(|s| s.is_idle(max_idle, now));
        state.sessions = active;
        idle
    }

    async fn check_rate_limit(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
        policy: &RateLimitPolicy,
    ) -> Result<Session, RepositoryError> {
        let mut state = self.state.lock().await;
        let index = state
            .position(connection_id)
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;

        let session = &mut state.sessions[index];
        session.touch(now);
        policy
            .check(session.last_message_at, now)
            .map_err(|retry_after_ms| RepositoryError::RateLimited { retry_after_ms })?;
        session.last_message_at = Some(now);

        Ok(session.clone())
    }

    async fn total_stats(&self) -> TotalStats {
        let state = self.state.lock().await;
        let active_rooms = state
            .rooms
            .keys()
            .filter(|room| state.count_members(room) > 0)
            .count();

        TotalStats {
            total_users: state.sessions.len(),
            total_rooms: state.rooms.len(),
            active_rooms,
        }
    }
}

#[async_trait]
impl RoomDirectory for InMemorySessionRepository {
    async fn record_message(&self, room: &RoomName) {
        let mut state = self.state.lock().await;
        if let Some(stats) = state.rooms.get_mut(room) {
            stats.total_messages += 1;
        }
    }

    async fn stats(&self, room: &RoomName) -> Option<RoomStats> {
        let state = self.state.lock().await;
        state.rooms.get(room).copied()
    }
}
