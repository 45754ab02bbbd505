//! Infrastructure layer
//!
//! ドメイン層の trait（SessionRepository, RoomDirectory, MessagePusher）の具体的な実装と、
//! 通信プロトコルごとの DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
