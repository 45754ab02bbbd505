//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, InboundEvent},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ConnectionHandler,
};

/// Error sent back for frames that are not a known client event
const MALFORMED_EVENT: &str = "Invalid event format";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued frames to the WebSocket sink.
///
/// The task ends when the connection is unregistered from the pusher
/// (the channel closes) or the socket stops accepting frames.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut handler = ConnectionHandler::open(
        ConnectionId::generate(),
        state.connection_usecases.clone(),
        tx,
    )
    .await;
    let connection_id = handler.id();
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(event) => handler.handle(InboundEvent::from(event)).await,
                        Err(e) => {
                            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
                            handler.report_error(MALFORMED_EVENT).await;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Connection '{}' closed by peer", connection_id);
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong is handled by the WebSocket protocol layer
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => {
                tracing::debug!("Outbound stream of '{}' ended", connection_id);
                break;
            }
        }
    }

    handler.handle(InboundEvent::Disconnect).await;
}
