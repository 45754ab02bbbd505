//! Protocol events exchanged with a connection.

use super::{
    entity::{ChatMessage, Session},
    value_object::{RoomName, Username},
};

/// Event received from a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Join { username: String, room: String },
    ChatMessage(String),
    Typing(bool),
    Disconnect,
}

/// Event sent to one connection or broadcast to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    Message(ChatMessage),
    /// Full roster replace
    RoomUsers { room: RoomName, users: Vec<Session> },
    Typing { username: Username, typing: bool },
    UserJoined { username: Username, room: RoomName },
    UserLeft { username: Username, room: RoomName },
    Error { message: String },
}

impl OutboundEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
