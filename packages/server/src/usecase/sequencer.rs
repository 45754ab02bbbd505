//! Per-room ordering of broadcasts.
//!
//! A transition that broadcasts to a room holds that room's lock while it mutates
//! the registry, reads the roster and enqueues its outbound events. Rosters of one
//! room are therefore dispatched in the order they were read. Different rooms do
//! not contend.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::RoomName;

#[derive(Debug, Default)]
pub struct RoomSequencer {
    rooms: Mutex<HashMap<RoomName, Arc<Mutex<()>>>>,
}

impl RoomSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive broadcast access to `room`
    pub async fn lock(&self, room: &RoomName) -> OwnedMutexGuard<()> {
        // Room entries are kept for the process lifetime, like room statistics.
        let room_lock = {
            let mut rooms = self.rooms.lock().await;
            rooms.entry(room.clone()).or_default().clone()
        };
        room_lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_room_is_serialized() {
        // テスト項目: 同じルームのロックは前の保持者が解放するまで取得できない
        // given (前提条件):
        let sequencer = Arc::new(RoomSequencer::new());
        let room = RoomName::new("general").unwrap();
        let guard = sequencer.lock(&room).await;

        // when (操作):
        let waiter = {
            let sequencer = sequencer.clone();
            let room = room.clone();
            tokio::spawn(async move {
                let _guard = sequencer.lock(&room).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // then (期待する結果):
        assert!(!waiter.is_finished());
        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_rooms_do_not_block_each_other() {
        // テスト項目: 異なるルームのロックは互いにブロックしない
        // given (前提条件):
        let sequencer = RoomSequencer::new();
        let general = RoomName::new("general").unwrap();
        let random = RoomName::new("random").unwrap();
        let _general_guard = sequencer.lock(&general).await;

        // when (操作):
        let result =
            tokio::time::timeout(Duration::from_millis(100), sequencer.lock(&random)).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
