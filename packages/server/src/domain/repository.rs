//! Repository trait 定義
//!
//! ドメイン層が必要とするセッション・ルーム統計へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 排他制御
//!
//! 各メソッドは 1 回のインメモリ操作として原子的に実行されなければなりません。
//! 実装はロック保持中に I/O を行ってはいけません。

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;

use super::{
    ConnectionId, RateLimitPolicy, RepositoryError, RoomName, RoomStats, RoomSummary, Session,
    Timestamp, TotalStats, Username,
};

/// Session Registry
///
/// 接続 ID → セッションの唯一の正となる対応表。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録（同じ接続 ID の古いエントリは上書き）し、ルーム統計を更新
    async fn join(
        &self,
        connection_id: ConnectionId,
        username: Username,
        room: RoomName,
        now: Timestamp,
    ) -> Session;

    /// セッションを取得し、見つかった場合は last_active_at を更新
    async fn get_current(&self, connection_id: &ConnectionId, now: Timestamp) -> Option<Session>;

    /// セッションを削除して返す（2 回目以降は None）
    async fn leave(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// ルームの現在のメンバー（参加順）
    async fn room_users(&self, room: &RoomName) -> Vec<Session>;

    /// メンバーのいる全ルームのスナップショット
    async fn all_rooms_summary(&self) -> BTreeMap<RoomName, RoomSummary>;

    /// `now - max_idle` より古いセッションを全て削除して返す
    async fn sweep_idle(&self, max_idle: Duration, now: Timestamp) -> Vec<Session>;

    /// レート制限の判定と last_message_at の記録を原子的に行う
    async fn check_rate_limit(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
        policy: &RateLimitPolicy,
    ) -> Result<Session, RepositoryError>;

    /// プロセス全体の統計
    async fn total_stats(&self) -> TotalStats;
}

/// Room Directory
///
/// ルームごとの単調増加カウンタ（作成時刻・ピーク人数・メッセージ数）への窓口。
/// メンバー構成については SessionRepository を信頼する。
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// メッセージ数をインクリメント（一度も参加者のいないルームでは何もしない）
    async fn record_message(&self, room: &RoomName);

    /// ルーム統計を取得
    async fn stats(&self, room: &RoomName) -> Option<RoomStats>;
}
