//! Room-wide presence broadcasts shared by join, leave and idle sweep.
//!
//! Callers hold the room's [`RoomSequencer`](super::RoomSequencer) lock.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessageFormatter, MessagePushError, MessagePusher, OutboundEvent, RoomName,
    Session, SessionRepository, Timestamp,
};

pub struct RoomNotifier {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    formatter: MessageFormatter,
}

impl RoomNotifier {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        formatter: MessageFormatter,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            formatter,
        }
    }

    /// Send the current roster of `room` to every member.
    ///
    /// Returns the number of members the roster was sent to.
    pub async fn broadcast_roster(&self, room: &RoomName) -> Result<usize, MessagePushError> {
        let users = self.repository.room_users(room).await;
        let targets: Vec<ConnectionId> = users.iter().map(|s| s.id).collect();
        let member_count = targets.len();

        self.message_pusher
            .broadcast(
                targets,
                &OutboundEvent::RoomUsers {
                    room: room.clone(),
                    users,
                },
            )
            .await?;

        tracing::debug!("Broadcasted roster of '{}' ({} members)", room, member_count);
        Ok(member_count)
    }

    /// Tell the remaining members that `session` has left, then send the new roster.
    ///
    /// `session` must already be removed from the registry.
    pub async fn announce_departure(
        &self,
        session: &Session,
        now: Timestamp,
    ) -> Result<(), MessagePushError> {
        let remaining: Vec<ConnectionId> = self
            .repository
            .room_users(&session.room)
            .await
            .iter()
            .map(|s| s.id)
            .collect();

        let left_message = self
            .formatter
            .system(format!("{} has left the chat!", session.username), now);
        self.message_pusher
            .broadcast(remaining.clone(), &OutboundEvent::Message(left_message))
            .await?;
        self.message_pusher
            .broadcast(
                remaining,
                &OutboundEvent::UserLeft {
                    username: session.username.clone(),
                    room: session.room.clone(),
                },
            )
            .await?;

        self.broadcast_roster(&session.room).await?;
        Ok(())
    }
}
