//! Periodic idle-session sweep.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::usecase::SweepIdleUseCase;

/// Spawn the sweep loop. The first sweep runs one `interval` after start.
///
/// The loop runs until the returned handle is aborted.
pub fn spawn_sweeper(usecase: Arc<SweepIdleUseCase>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            "Idle sweeper started (every {:?}, idle timeout {:?})",
            interval,
            usecase.idle_timeout()
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval の最初の tick は即座に完了する
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let swept = usecase.execute().await;
            tracing::debug!("Idle sweep finished ({} removed)", swept);
        }
    })
}
