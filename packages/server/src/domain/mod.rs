//! Domain layer
//!
//! チャットリレーのドメインモデル（値オブジェクト・エンティティ・イベント）と、
//! 外側の層が実装するインターフェース（Repository, MessagePusher）を定義します。

pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod formatter;
pub mod message_pusher;
pub mod rate_limit;
pub mod repository;
pub mod value_object;

pub use command::ChatCommand;
pub use entity::{ChatMessage, ConnectionState, RoomStats, RoomSummary, Session, TotalStats};
pub use error::{MessagePushError, RepositoryError, ValidationError};
pub use event::{InboundEvent, OutboundEvent};
pub use formatter::{BOT_NAME, MessageFormatter};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use rate_limit::RateLimitPolicy;
pub use repository::{RoomDirectory, SessionRepository};
pub use value_object::{ConnectionId, MessageText, RoomName, Timestamp, Username};
