//! UseCase errors.

use thiserror::Error;

use crate::domain::{RoomName, ValidationError};

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 参加中の接続からの再参加（別のルームへは一度切断してから参加する）
    #[error("Already joined room '{0}'")]
    AlreadyJoined(RoomName),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// セッションがない（切断や掃除との競合で正当に起こりうる）
    #[error("Session not found")]
    SessionNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Please wait a moment before sending another message")]
    RateLimited { retry_after_ms: i64 },

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// 入力中通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error(transparent)]
    InvalidRoomName(#[from] ValidationError),

    #[error("Room not found")]
    RoomNotFound,
}
