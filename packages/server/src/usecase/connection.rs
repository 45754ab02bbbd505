//! UseCase: 接続ごとのプロトコル状態機械
//!
//! ## 状態遷移
//!
//! - `Unjoined --joinRoom--> Joined`（失敗時は error イベントを返して Unjoined のまま）
//! - `Joined --chatMessage / typing--> Joined`
//! - `Joined --joinRoom-->` はセッションが残っていれば error イベント（再参加には一度切断が必要）
//! - `* --disconnect--> Closed`（冪等）
//! - `Closed` では全てのイベントを無視
//!
//! 掃除などでセッションが消えていた場合は、何も送らずに Unjoined に戻ります。
//! 参加中かどうかは Repository のセッションで判定するため、掃除直後の joinRoom は新しい参加になります。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectionHandler::handle() / close() による状態遷移と、クライアントに返るイベント
//!
//! ### なぜこのテストが必要か
//! - 不正な入力が error イベント 1 件だけになり、他のメンバーに影響しないことを保証
//! - 切断処理が何度呼ばれてもセッションが 1 回だけ解放されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加 → 発言 → 切断
//! - 異常系：長すぎるメッセージ、レート制限、参加中の再参加、不正な参加情報
//! - エッジケース：二重切断、掃除後のイベント

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionState, InboundEvent, MessagePusher, OutboundEvent, PusherChannel,
};

use super::{
    JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, TypingUseCase,
    error::{JoinError, SendMessageError, TypingError},
};

/// 接続が利用するユースケース一式
#[derive(Clone)]
pub struct ConnectionUseCases {
    pub join_room: Arc<JoinRoomUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub typing: Arc<TypingUseCase>,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub message_pusher: Arc<dyn MessagePusher>,
}

/// 1 つの接続のプロトコル状態機械
pub struct ConnectionHandler {
    id: ConnectionId,
    usecases: ConnectionUseCases,
    state: ConnectionState,
}

impl ConnectionHandler {
    /// 接続を開き、送信チャンネルを MessagePusher に登録する
    pub async fn open(
        id: ConnectionId,
        usecases: ConnectionUseCases,
        sender: PusherChannel,
    ) -> Self {
        usecases.message_pusher.register_client(id, sender).await;
        tracing::info!("Connection '{}' opened", id);
        Self {
            id,
            usecases,
            state: ConnectionState::Unjoined,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// 受信したイベントを現在の状態に応じて処理する
    pub async fn handle(&mut self, event: InboundEvent) {
        if self.state == ConnectionState::Closed {
            tracing::debug!("Ignoring event on closed connection '{}'", self.id);
            return;
        }

        match event {
            InboundEvent::Join { username, room } => self.on_join(&username, &room).await,
            InboundEvent::ChatMessage(text) => self.on_chat_message(&text).await,
            InboundEvent::Typing(typing) => self.on_typing(typing).await,
            InboundEvent::Disconnect => self.close().await,
        }
    }

    /// 送信者にだけ error イベントを送る
    pub async fn report_error(&self, message: impl Into<String>) {
        let event = OutboundEvent::error(message);
        if let Err(e) = self.usecases.message_pusher.push_to(&self.id, &event).await {
            tracing::warn!("Failed to send error to '{}': {}", self.id, e);
        }
    }

    /// 接続を閉じる。セッションの解放と登録解除は 1 回だけ行われる。
    pub async fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Closed);
        match previous {
            ConnectionState::Closed => return,
            ConnectionState::Joined { room } => {
                self.usecases.leave_room.execute(&self.id, &room).await;
            }
            ConnectionState::Unjoined => {}
        }

        self.usecases.message_pusher.unregister_client(&self.id).await;
        tracing::info!("Connection '{}' closed", self.id);
    }

    async fn on_join(&mut self, username: &str, room: &str) {
        match self.usecases.join_room.execute(self.id, username, room).await {
            Ok(session) => {
                self.state = ConnectionState::Joined { room: session.room };
            }
            Err(e) => {
                if !matches!(e, JoinError::AlreadyJoined(_))
                    && matches!(self.state, ConnectionState::Joined { .. })
                {
                    self.fall_back_to_unjoined();
                }
                tracing::debug!("Rejected join from '{}': {}", self.id, e);
                self.report_error(e.to_string()).await;
            }
        }
    }

    async fn on_chat_message(&mut self, text: &str) {
        if !matches!(self.state, ConnectionState::Joined { .. }) {
            tracing::debug!("Ignoring message from unjoined connection '{}'", self.id);
            return;
        }

        match self.usecases.send_message.execute(self.id, text).await {
            Ok(outcome) => {
                tracing::debug!("Message from '{}' handled: {:?}", self.id, outcome);
            }
            Err(SendMessageError::SessionNotFound) => self.fall_back_to_unjoined(),
            Err(SendMessageError::BroadcastFailed(e)) => {
                tracing::warn!("Failed to broadcast message from '{}': {}", self.id, e);
            }
            Err(e @ SendMessageError::Validation(_))
            | Err(e @ SendMessageError::RateLimited { .. }) => {
                tracing::debug!("Rejected message from '{}': {}", self.id, e);
                self.report_error(e.to_string()).await;
            }
        }
    }

    async fn on_typing(&mut self, typing: bool) {
        if !matches!(self.state, ConnectionState::Joined { .. }) {
            return;
        }

        match self.usecases.typing.execute(self.id, typing).await {
            Ok(_) => {}
            Err(TypingError::SessionNotFound) => self.fall_back_to_unjoined(),
            Err(TypingError::BroadcastFailed(e)) => {
                tracing::warn!("Failed to broadcast typing of '{}': {}", self.id, e);
            }
        }
    }

    fn fall_back_to_unjoined(&mut self) {
        tracing::info!(
            "Session of connection '{}' is gone, waiting for a new join",
            self.id
        );
        self.state = ConnectionState::Unjoined;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use hiroba_shared::time::Clock;

    use super::*;
    use crate::{
        domain::{RateLimitPolicy, RoomName, SessionRepository, Timestamp},
        infrastructure::dto::websocket::ServerEvent,
        usecase::test_support::{TestHarness, drain, last_roster, message_texts},
    };

    async fn open_handler(
        harness: &TestHarness,
        policy: RateLimitPolicy,
    ) -> (ConnectionHandler, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = ConnectionHandler::open(
            ConnectionId::generate(),
            harness.connection_usecases(policy),
            tx,
        )
        .await;
        (handler, rx)
    }

    fn join_event(username: &str, room: &str) -> InboundEvent {
        InboundEvent::Join {
            username: username.to_string(),
            room: room.to_string(),
        }
    }

    fn errors(events: &[ServerEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ServerEvent::Error(p) => Some(p.message.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_join_then_chat_then_disconnect() {
        // テスト項目: 参加 → 発言 → 切断の一連の流れで状態とイベントが正しく遷移する
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        let (mut bob, mut bob_rx) = open_handler(&harness, RateLimitPolicy::default()).await;

        // when (操作):
        alice.handle(join_event("alice", "general")).await;
        bob.handle(join_event("bob", "general")).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);
        alice
            .handle(InboundEvent::ChatMessage("hello".to_string()))
            .await;
        alice.handle(InboundEvent::Disconnect).await;

        // then (期待する結果):
        assert_eq!(alice.state(), &ConnectionState::Closed);
        assert_eq!(
            bob.state(),
            &ConnectionState::Joined {
                room: RoomName::new("general").unwrap()
            }
        );
        assert_eq!(
            message_texts(&drain(&mut bob_rx)),
            vec!["hello", "alice has left the chat!"]
        );
        assert_eq!(message_texts(&drain(&mut alice_rx)), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_too_long_message_yields_single_error() {
        // テスト項目: 500 文字を超えるメッセージは送信者に error が 1 件だけ届き、他には何も届かない
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        let (mut bob, mut bob_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        alice.handle(join_event("alice", "general")).await;
        bob.handle(join_event("bob", "general")).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        alice
            .handle(InboundEvent::ChatMessage("x".repeat(501)))
            .await;

        // then (期待する結果):
        let events = drain(&mut alice_rx);
        assert_eq!(events.len(), 1);
        assert_eq!(
            errors(&events),
            vec!["Please keep messages under 500 characters"]
        );
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_message_is_dropped_with_error() {
        // テスト項目: 最小間隔内の 2 通目は error となり、ルームには 1 通目だけが届く
        // given (前提条件):
        let harness = TestHarness::new();
        let policy = RateLimitPolicy::new(Duration::from_millis(500));
        let (mut alice, mut alice_rx) = open_handler(&harness, policy).await;
        let (mut bob, mut bob_rx) = open_handler(&harness, policy).await;
        alice.handle(join_event("alice", "general")).await;
        bob.handle(join_event("bob", "general")).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        alice
            .handle(InboundEvent::ChatMessage("first".to_string()))
            .await;
        harness.clock.advance(10);
        alice
            .handle(InboundEvent::ChatMessage("second".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(
            errors(&drain(&mut alice_rx)),
            vec!["Please wait a moment before sending another message"]
        );
        assert_eq!(message_texts(&drain(&mut bob_rx)), vec!["first"]);
    }

    #[tokio::test]
    async fn test_invalid_join_stays_unjoined() {
        // テスト項目: 不正な参加情報では error が届き、Unjoined のまま再試行できる
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;

        // when (操作):
        alice.handle(join_event("", "general")).await;
        let after_failure = alice.state().clone();
        alice.handle(join_event("alice", "general")).await;

        // then (期待する結果):
        assert_eq!(after_failure, ConnectionState::Unjoined);
        assert!(matches!(alice.state(), ConnectionState::Joined { .. }));
        let events = drain(&mut alice_rx);
        assert_eq!(errors(&events), vec!["Username is required"]);
    }

    #[tokio::test]
    async fn test_join_while_joined_is_rejected() {
        // テスト項目: 参加中の再参加は error となり、元のルームに留まる
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        alice.handle(join_event("alice", "general")).await;
        drain(&mut alice_rx);

        // when (操作):
        alice.handle(join_event("alice", "random")).await;

        // then (期待する結果):
        assert_eq!(
            errors(&drain(&mut alice_rx)),
            vec!["Already joined room 'general'"]
        );
        assert_eq!(
            alice.state(),
            &ConnectionState::Joined {
                room: RoomName::new("general").unwrap()
            }
        );
        let session = harness
            .repository
            .get_current(&alice.id(), Timestamp::new(0))
            .await
            .unwrap();
        assert_eq!(session.room.as_str(), "general");
    }

    #[tokio::test]
    async fn test_double_disconnect_releases_once() {
        // テスト項目: 二重の切断でも退出通知は 1 回だけで、閉じた後のイベントは無視される
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, _alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        let (mut bob, mut bob_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        alice.handle(join_event("alice", "general")).await;
        bob.handle(join_event("bob", "general")).await;
        drain(&mut bob_rx);

        // when (操作):
        alice.handle(InboundEvent::Disconnect).await;
        alice.close().await;
        alice
            .handle(InboundEvent::ChatMessage("ghost".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(alice.state(), &ConnectionState::Closed);
        assert_eq!(
            message_texts(&drain(&mut bob_rx)),
            vec!["alice has left the chat!"]
        );
    }

    #[tokio::test]
    async fn test_chat_before_join_is_ignored() {
        // テスト項目: 参加前のメッセージと入力中通知は何も起こさない
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;

        // when (操作):
        alice
            .handle(InboundEvent::ChatMessage("hello".to_string()))
            .await;
        alice.handle(InboundEvent::Typing(true)).await;

        // then (期待する結果):
        assert_eq!(alice.state(), &ConnectionState::Unjoined);
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_swept_session_falls_back_to_unjoined() {
        // テスト項目: 掃除されたセッションへのメッセージは無視され、再び参加できる
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        alice.handle(join_event("alice", "general")).await;
        harness.clock.advance(2 * 60 * 60 * 1000);
        harness
            .sweep_idle_usecase(Duration::from_secs(60 * 60))
            .execute()
            .await;
        drain(&mut alice_rx);

        // when (操作):
        alice
            .handle(InboundEvent::ChatMessage("still here?".to_string()))
            .await;
        let after_sweep = alice.state().clone();
        alice.handle(join_event("alice", "general")).await;

        // then (期待する結果):
        assert_eq!(after_sweep, ConnectionState::Unjoined);
        assert!(matches!(alice.state(), ConnectionState::Joined { .. }));
        let events = drain(&mut alice_rx);
        assert!(errors(&events).is_empty());
        assert!(!message_texts(&events).contains(&"still here?".to_string()));
    }

    #[tokio::test]
    async fn test_join_right_after_sweep_starts_new_session() {
        // テスト項目: 掃除直後の joinRoom は拒否されず、新しいルームへの参加になる
        // given (前提条件):
        let harness = TestHarness::new();
        let (mut alice, mut alice_rx) = open_handler(&harness, RateLimitPolicy::default()).await;
        alice.handle(join_event("alice", "general")).await;
        harness.clock.advance(2 * 60 * 60 * 1000);
        harness
            .sweep_idle_usecase(Duration::from_secs(60 * 60))
            .execute()
            .await;
        drain(&mut alice_rx);

        // when (操作):
        alice.handle(join_event("alice", "random")).await;

        // then (期待する結果):
        let random = RoomName::new("random").unwrap();
        assert_eq!(
            alice.state(),
            &ConnectionState::Joined {
                room: random.clone()
            }
        );
        let events = drain(&mut alice_rx);
        assert!(errors(&events).is_empty());
        assert_eq!(last_roster(&events), Some(vec!["alice".to_string()]));
        let session = harness
            .repository
            .get_current(&alice.id(), Timestamp::new(harness.clock.now_millis()))
            .await
            .unwrap();
        assert_eq!(session.room, random);
    }
}
