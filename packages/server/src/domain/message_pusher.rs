//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信を抽象化します。
//! 具体的な送信手段（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// クライアントごとの送信チャンネル（シリアライズ済みのフレームを運ぶ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 送信はキューへの投入のみで完了し、ブロックしない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信
    ///
    /// 切断済みのクライアントはスキップされ、他の宛先への配信は継続される。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
