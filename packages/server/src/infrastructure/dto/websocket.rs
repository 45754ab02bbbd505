//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"type": <event name>, "payload": <data>}`.

use serde::{Deserialize, Serialize};

/// Event sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom(JoinRoomPayload),
    /// Raw message text
    ChatMessage(String),
    Typing(TypingPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub username: String,
    pub room: String,
}

/// Typing indicator from a client.
///
/// `username` and `room` are accepted for compatibility but the session is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    pub typing: bool,
}

/// Event sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    Message(MessagePayload),
    RoomUsers(RoomUsersPayload),
    Typing(TypingStatusPayload),
    UserJoined(PresencePayload),
    UserLeft(PresencePayload),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub username: String,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUsersPayload {
    pub room: String,
    pub users: Vec<RoomUserInfo>,
}

/// Roster entry (timestamps are Unix milliseconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUserInfo {
    pub id: String,
    pub username: String,
    pub joined_at: i64,
    pub last_active: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingStatusPayload {
    pub username: String,
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresencePayload {
    pub username: String,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_room_event() {
        // テスト項目: joinRoom イベントの JSON がパースできる
        // given (前提条件):
        let json = r#"{"type":"joinRoom","payload":{"username":"alice","room":"general"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::JoinRoom(JoinRoomPayload {
                username: "alice".to_string(),
                room: "general".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_chat_message_event_with_raw_text() {
        // テスト項目: chatMessage のペイロードは生の文字列
        // given (前提条件):
        let json = r#"{"type":"chatMessage","payload":"hello <world>"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::ChatMessage("hello <world>".to_string()));
    }

    #[test]
    fn test_parse_typing_event_without_optional_fields() {
        // テスト項目: typing イベントは username / room を省略できる
        // given (前提条件):
        let json = r#"{"type":"typing","payload":{"typing":true}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Typing(TypingPayload {
                username: None,
                room: None,
                typing: true,
            })
        );
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        // テスト項目: 未知のイベント種別はパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"shout","payload":"hi"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_room_users_event() {
        // テスト項目: roomUsers イベントが camelCase のフィールド名でシリアライズされる
        // given (前提条件):
        let event = ServerEvent::RoomUsers(RoomUsersPayload {
            room: "general".to_string(),
            users: vec![RoomUserInfo {
                id: "c1".to_string(),
                username: "alice".to_string(),
                joined_at: 1000,
                last_active: 2000,
            }],
        });

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "roomUsers");
        assert_eq!(json["payload"]["room"], "general");
        assert_eq!(json["payload"]["users"][0]["username"], "alice");
        assert_eq!(json["payload"]["users"][0]["joinedAt"], 1000);
        assert_eq!(json["payload"]["users"][0]["lastActive"], 2000);
    }
}
