//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 空メッセージの無視、長さ制限、レート制限、コマンド処理、ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 制限に違反したメッセージがルームのメンバーに届かないことを保証
//! - コマンドの返信が送信者以外に漏れないことを保証
//! - メッセージ数カウンタがブロードキャストされたメッセージだけを数えることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含むルーム全員へのブロードキャスト
//! - 異常系：501 文字以上、最小間隔内の連続送信、セッションなし
//! - エッジケース：空白のみのメッセージ、未知のコマンド

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatCommand, ConnectionId, MessageFormatter, MessagePusher, MessageText, OutboundEvent,
    RateLimitPolicy, RepositoryError, RoomDirectory, Session, SessionRepository, Timestamp,
    ValidationError, command::HELP_TEXT,
};

use super::{error::SendMessageError, sequencer::RoomSequencer};

/// メッセージ送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// 空白のみのため何もしなかった
    Ignored,
    /// ルームにブロードキャストした（送信者を含む宛先数）
    Broadcast { recipients: usize },
    /// コマンドとして送信者にのみ返信した
    Command(ChatCommand),
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn SessionRepository>,
    room_directory: Arc<dyn RoomDirectory>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<RoomSequencer>,
    formatter: MessageFormatter,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        room_directory: Arc<dyn RoomDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<RoomSequencer>,
        formatter: MessageFormatter,
        clock: Arc<dyn Clock>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            repository,
            room_directory,
            message_pusher,
            sequencer,
            formatter,
            clock,
            policy,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `raw_text` - クライアントから届いた生のテキスト
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - 無視・ブロードキャスト・コマンド返信のいずれか
    /// * `Err(SendMessageError)` - セッションなし・長さ超過・レート制限
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_text: &str,
    ) -> Result<SendOutcome, SendMessageError> {
        let now = Timestamp::new(self.clock.now_millis());

        // 1. セッションの確認（アクティビティとして記録される）
        let session = self
            .repository
            .get_current(&connection_id, now)
            .await
            .ok_or(SendMessageError::SessionNotFound)?;

        // 2. 形式の検証
        let text = match MessageText::new(raw_text) {
            Ok(text) => text,
            Err(ValidationError::EmptyMessage) => return Ok(SendOutcome::Ignored),
            Err(e) => return Err(e.into()),
        };

        // 3. レート制限（判定と記録は Repository のロック内で原子的に行われる）
        self.repository
            .check_rate_limit(&connection_id, now, &self.policy)
            .await
            .map_err(|e| match e {
                RepositoryError::RateLimited { retry_after_ms } => {
                    SendMessageError::RateLimited { retry_after_ms }
                }
                RepositoryError::SessionNotFound(_) => SendMessageError::SessionNotFound,
            })?;

        // 4. コマンドは送信者にのみ返信
        if let Some(command) = ChatCommand::parse(text.as_str()) {
            self.reply_to_command(&session, &command, now).await;
            return Ok(SendOutcome::Command(command));
        }

        // 5. ルーム全員（送信者を含む）にブロードキャスト
        let _room_guard = self.sequencer.lock(&session.room).await;
        let targets: Vec<ConnectionId> = self
            .repository
            .room_users(&session.room)
            .await
            .iter()
            .map(|s| s.id)
            .collect();
        let recipients = targets.len();

        let message = self
            .formatter
            .format(session.username.as_str(), text.into_string(), now);
        self.message_pusher
            .broadcast(targets, &OutboundEvent::Message(message))
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))?;
        self.room_directory.record_message(&session.room).await;

        tracing::debug!(
            "Broadcasted message from '{}' to {} members of '{}'",
            session.username,
            recipients,
            session.room
        );
        Ok(SendOutcome::Broadcast { recipients })
    }

    async fn reply_to_command(&self, session: &Session, command: &ChatCommand, now: Timestamp) {
        let reply = match command {
            ChatCommand::Help => HELP_TEXT.to_string(),
            ChatCommand::Users => {
                let names: Vec<String> = self
                    .repository
                    .room_users(&session.room)
                    .await
                    .iter()
                    .map(|s| s.username.as_str().to_string())
                    .collect();
                format!(
                    "Users in {} ({}): {}",
                    session.room,
                    names.len(),
                    names.join(", ")
                )
            }
            ChatCommand::Time => format!("Server time: {}", self.formatter.server_time(now)),
            ChatCommand::Unknown(name) => {
                format!("Unknown command: /{name}. Type /help for available commands.")
            }
        };

        let event = OutboundEvent::Message(self.formatter.system(reply, now));
        if let Err(e) = self.message_pusher.push_to(&session.id, &event).await {
            tracing::warn!("Failed to reply to command from '{}': {}", session.id, e);
        }
    }
}
