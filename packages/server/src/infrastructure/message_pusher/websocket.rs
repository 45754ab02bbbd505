//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - ドメインイベントを JSON フレームにシリアライズして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの投入のみなのでブロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する WebSocket sender のマップ
pub struct WebSocketMessagePusher {
    /// Key: ConnectionId, Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(client_id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push message to client '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
            } else {
                tracing::debug!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
