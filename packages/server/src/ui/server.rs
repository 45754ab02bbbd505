//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::SweepIdleUseCase;

use super::{
    handler::{get_room_detail, get_rooms, get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    sweeper::spawn_sweeper,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket chat relay server
///
/// Owns the shared state and the idle sweeper; see
/// [`build_server`](crate::bootstrap::build_server) for the wiring.
///
/// # Example
///
/// ```ignore
/// let server = build_server(&config, Arc::new(SystemClock));
/// server.run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// SweepIdleUseCase（アイドルセッション掃除のユースケース）
    sweep_idle_usecase: Arc<SweepIdleUseCase>,
    sweep_interval: Duration,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `state` - Use cases and settings shared by every handler
    /// * `sweep_idle_usecase` - UseCase run by the periodic sweeper
    /// * `sweep_interval` - Time between two sweeps
    pub fn new(
        state: AppState,
        sweep_idle_usecase: Arc<SweepIdleUseCase>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(state),
            sweep_idle_usecase,
            sweep_interval,
        }
    }

    /// Build the router with every route of the relay
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, bind_addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(bind_addr).await?;

        tracing::info!("Hiroba chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// The idle sweeper runs for as long as the server does.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let sweeper = spawn_sweeper(self.sweep_idle_usecase.clone(), self.sweep_interval);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        sweeper.abort();
        result?;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
