//! Shared fixtures for use case tests.

use std::{sync::Arc, time::Duration};

use chrono::FixedOffset;
use hiroba_shared::time::ManualClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageFormatter, MessagePusher, RateLimitPolicy, RoomDirectory},
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionRepository,
    },
};

use super::{
    ConnectionUseCases, JoinRoomUseCase, LeaveRoomUseCase, RoomNotifier, RoomSequencer,
    SendMessageUseCase, SweepIdleUseCase, TypingUseCase,
};

/// 2023-01-01 15:45:00 UTC
pub const START_MILLIS: i64 = 1672587900000;

pub struct TestHarness {
    pub repository: Arc<InMemorySessionRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub sequencer: Arc<RoomSequencer>,
    pub clock: Arc<ManualClock>,
    pub formatter: MessageFormatter,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemorySessionRepository::new()),
            message_pusher: Arc::new(WebSocketMessagePusher::default()),
            sequencer: Arc::new(RoomSequencer::new()),
            clock: Arc::new(ManualClock::new(START_MILLIS)),
            formatter: MessageFormatter::new(FixedOffset::east_opt(0).unwrap()),
        }
    }

    /// Register a fresh connection with the pusher
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_pusher.register_client(id, tx).await;
        (id, rx)
    }

    pub fn notifier(&self) -> Arc<RoomNotifier> {
        Arc::new(RoomNotifier::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            self.formatter,
        ))
    }

    pub fn join_room_usecase(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            self.notifier(),
            self.sequencer.clone(),
            self.formatter,
            self.clock.clone(),
        )
    }

    pub fn send_message_usecase(&self, policy: RateLimitPolicy) -> SendMessageUseCase {
        let room_directory: Arc<dyn RoomDirectory> = self.repository.clone();
        SendMessageUseCase::new(
            self.repository.clone(),
            room_directory,
            self.message_pusher.clone(),
            self.sequencer.clone(),
            self.formatter,
            self.clock.clone(),
            policy,
        )
    }

    pub fn typing_usecase(&self) -> TypingUseCase {
        TypingUseCase::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            self.sequencer.clone(),
            self.clock.clone(),
        )
    }

    pub fn leave_room_usecase(&self) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(
            self.repository.clone(),
            self.notifier(),
            self.sequencer.clone(),
            self.clock.clone(),
        )
    }

    pub fn sweep_idle_usecase(&self, idle_timeout: Duration) -> SweepIdleUseCase {
        SweepIdleUseCase::new(
            self.repository.clone(),
            self.notifier(),
            self.sequencer.clone(),
            self.clock.clone(),
            idle_timeout,
        )
    }

    pub fn connection_usecases(&self, policy: RateLimitPolicy) -> ConnectionUseCases {
        ConnectionUseCases {
            join_room: Arc::new(self.join_room_usecase()),
            send_message: Arc::new(self.send_message_usecase(policy)),
            typing: Arc::new(self.typing_usecase()),
            leave_room: Arc::new(self.leave_room_usecase()),
            message_pusher: self.message_pusher.clone(),
        }
    }
}

/// Collect every frame already queued for a connection
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        events.push(serde_json::from_str(&frame).expect("frame should be a server event"));
    }
    events
}

/// Texts of the `message` events in `events`
pub fn message_texts(events: &[ServerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::Message(payload) => Some(payload.text.clone()),
            _ => None,
        })
        .collect()
}

/// Usernames of the last `roomUsers` event in `events`
pub fn last_roster(events: &[ServerEvent]) -> Option<Vec<String>> {
    events.iter().rev().find_map(|event| match event {
        ServerEvent::RoomUsers(payload) => Some(
            payload
                .users
                .iter()
                .map(|user| user.username.clone())
                .collect(),
        ),
        _ => None,
    })
}
