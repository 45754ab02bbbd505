//! Dependency wiring for the relay server.

use std::{sync::Arc, time::Instant};

use hiroba_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{MessageFormatter, RateLimitPolicy},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::{Server, state::AppState},
    usecase::{
        ConnectionUseCases, GetRoomDetailUseCase, GetRoomsUseCase, GetStatsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, RoomNotifier, RoomSequencer, SendMessageUseCase,
        SweepIdleUseCase, TypingUseCase,
    },
};

/// Build a server from `config`, reading time from `clock`
pub fn build_server(config: &ServerConfig, clock: Arc<dyn Clock>) -> Server {
    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create Repository (in-memory session registry and room directory)
    let repository = Arc::new(InMemorySessionRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create UseCases
    let formatter = MessageFormatter::new(config.utc_offset);
    let sequencer = Arc::new(RoomSequencer::new());
    let notifier = Arc::new(RoomNotifier::new(
        repository.clone(),
        message_pusher.clone(),
        formatter,
    ));

    let connection_usecases = ConnectionUseCases {
        join_room: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            notifier.clone(),
            sequencer.clone(),
            formatter,
            clock.clone(),
        )),
        send_message: Arc::new(SendMessageUseCase::new(
            repository.clone(),
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
            formatter,
            clock.clone(),
            RateLimitPolicy::new(config.min_message_interval),
        )),
        typing: Arc::new(TypingUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            sequencer.clone(),
            clock.clone(),
        )),
        leave_room: Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            notifier.clone(),
            sequencer.clone(),
            clock.clone(),
        )),
        message_pusher,
    };
    let sweep_idle_usecase = Arc::new(SweepIdleUseCase::new(
        repository.clone(),
        notifier,
        sequencer,
        clock,
        config.idle_timeout,
    ));

    // 4. Create AppState
    let state = AppState {
        connection_usecases,
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(
            repository.clone(),
            repository.clone(),
        )),
        get_stats_usecase: Arc::new(GetStatsUseCase::new(repository)),
        utc_offset: config.utc_offset,
        started_at: Instant::now(),
    };

    // 5. Create the server
    Server::new(state, sweep_idle_usecase, config.sweep_interval)
}
