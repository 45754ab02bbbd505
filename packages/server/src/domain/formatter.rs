//! Message formatting.
//!
//! Text is transmitted raw. Escaping untrusted content is the job of whatever renders it.

use chrono::FixedOffset;
use hiroba_shared::time::timestamp_to_short_time;

use super::{entity::ChatMessage, value_object::Timestamp};

/// Sender name of every system-generated message
pub const BOT_NAME: &str = "Hiroba Bot";

/// Stamps messages with the server time in a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter {
    offset: FixedOffset,
}

impl MessageFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build a wire-ready message
    ///
    /// # Arguments
    ///
    /// * `username` - Sender name (a user, or [`BOT_NAME`])
    /// * `text` - Message body, passed through unchanged
    /// * `now` - Server time of the message
    pub fn format(
        &self,
        username: impl Into<String>,
        text: impl Into<String>,
        now: Timestamp,
    ) -> ChatMessage {
        ChatMessage {
            username: username.into(),
            text: text.into(),
            time: self.server_time(now),
        }
    }

    /// Build a message sent by [`BOT_NAME`]
    pub fn system(&self, text: impl Into<String>, now: Timestamp) -> ChatMessage {
        self.format(BOT_NAME, text, now)
    }

    /// Short wall-clock time, e.g. `3:45 pm`
    pub fn server_time(&self, now: Timestamp) -> String {
        timestamp_to_short_time(now.value(), self.offset)
    }
}
