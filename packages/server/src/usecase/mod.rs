//! UseCase layer
//!
//! 接続ごとのプロトコル状態機械（ConnectionHandler）と、
//! 各遷移（参加・メッセージ送信・入力中通知・退出・アイドル掃除）のユースケースを提供します。

mod connection;
mod error;
mod get_room_detail;
mod get_rooms;
mod get_stats;
mod join_room;
mod leave_room;
mod notifier;
mod send_message;
mod sequencer;
mod sweep_idle;
mod typing;

#[cfg(test)]
mod test_support;

pub use connection::{ConnectionHandler, ConnectionUseCases};
pub use error::{GetRoomDetailError, JoinError, SendMessageError, TypingError};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::GetRoomsUseCase;
pub use get_stats::GetStatsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use notifier::RoomNotifier;
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use sequencer::RoomSequencer;
pub use sweep_idle::SweepIdleUseCase;
pub use typing::TypingUseCase;
