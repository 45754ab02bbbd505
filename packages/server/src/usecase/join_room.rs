//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入力検証、セッション登録、参加者本人・他メンバーへの通知
//!
//! ### なぜこのテストが必要か
//! - 不正なユーザー名でセッションが作られないことを保証
//! - 1 つの接続が同時に 2 つのセッションを持たないことを保証
//! - 参加を契機としたロスターが常に最新のメンバー構成を反映することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存メンバーのいるルームへの参加
//! - 異常系：ユーザー名・ルーム名の検証エラー、参加済みの接続からの再参加
//! - 並行系：同じルームへの同時参加

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessageFormatter, MessagePushError, MessagePusher, OutboundEvent, RoomName,
    Session, SessionRepository, Timestamp, Username,
};

use super::{error::JoinError, notifier::RoomNotifier, sequencer::RoomSequencer};

/// 参加者本人に送る歓迎メッセージ
pub const WELCOME_TEXT: &str = "Welcome to Hiroba!";

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    notifier: Arc<RoomNotifier>,
    sequencer: Arc<RoomSequencer>,
    formatter: MessageFormatter,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        notifier: Arc<RoomNotifier>,
        sequencer: Arc<RoomSequencer>,
        formatter: MessageFormatter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            notifier,
            sequencer,
            formatter,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `username` - 生のユーザー名（trim 前）
    /// * `room` - 生のルーム名（trim 前）
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 登録されたセッション
    /// * `Err(JoinError)` - 参加済み・検証エラー（セッションは作成されない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        username: &str,
        room: &str,
    ) -> Result<Session, JoinError> {
        // 1. 登録済みのセッションがあれば再参加は拒否（掃除済みなら新規参加になる）
        let now = Timestamp::new(self.clock.now_millis());
        if let Some(current) = self.repository.get_current(&connection_id, now).await {
            return Err(JoinError::AlreadyJoined(current.room));
        }

        // 2. 入力検証（セッションを作る前に行う）
        let username = Username::new(username)?;
        let room = RoomName::new(room)?;

        // 3. ルームの送信順序を確保してから登録
        let _room_guard = self.sequencer.lock(&room).await;
        let session = self
            .repository
            .join(connection_id, username, room.clone(), now)
            .await;
        tracing::info!(
            "'{}' joined room '{}' (connection '{}')",
            session.username,
            session.room,
            connection_id
        );

        // 4. 本人への歓迎メッセージ
        let welcome = OutboundEvent::Message(self.formatter.system(WELCOME_TEXT, now));
        if let Err(e) = self.message_pusher.push_to(&connection_id, &welcome).await {
            tracing::warn!("Failed to send welcome to '{}': {}", connection_id, e);
        }

        // 5. 他のメンバーへの参加通知
        if let Err(e) = self.announce_arrival(&session, now).await {
            tracing::warn!("Failed to broadcast arrival of '{}': {}", session.username, e);
        }

        // 6. ルーム全体（本人を含む）へのロスター
        if let Err(e) = self.notifier.broadcast_roster(&room).await {
            tracing::warn!("Failed to broadcast roster of '{}': {}", room, e);
        }

        Ok(session)
    }

    async fn announce_arrival(
        &self,
        session: &Session,
        now: Timestamp,
    ) -> Result<(), MessagePushError> {
        let others: Vec<ConnectionId> = self
            .repository
            .room_users(&session.room)
            .await
            .iter()
            .map(|s| s.id)
            .filter(|id| id != &session.id)
            .collect();

        let joined_message = self
            .formatter
            .system(format!("{} has joined the chat!", session.username), now);
        self.message_pusher
            .broadcast(others.clone(), &OutboundEvent::Message(joined_message))
            .await?;
        self.message_pusher
            .broadcast(
                others,
                &OutboundEvent::UserJoined {
                    username: session.username.clone(),
                    room: session.room.clone(),
                },
            )
            .await
    }
}
