//! オフィスレジストリのインターフェース定義
//!
//! オフィスの遅延生成・破棄と、オフィス単位の状態遷移＋ファンアウトを
//! 1 つのシームにまとめたトレイト。依存性逆転の原則 (DIP) に基づき、
//! 具象実装（インメモリ等）は infrastructure 層に置きます。
//!
//! - Infrastructure 層がドメイン層のインターフェースに依存
//! - ドメイン層は Infrastructure 層に依存しない

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    entity::{ChatMessage, Member, Vec3},
    value_object::{ConnectionId, OfficeId, Timestamp, UserId},
};

/// join 完了時に参加者本人へ返すスナップショット
///
/// `presence` は参加時点の他メンバー（参加順）、`chat_history` は
/// そのオフィスが保持する直近のチャット（古い順）です。
#[derive(Debug, Clone)]
pub struct JoinSnapshot {
    pub presence: Vec<Member>,
    pub chat_history: Vec<ChatMessage>,
}

/// オフィス一覧用のサマリ
#[derive(Debug, Clone)]
pub struct OfficeSummary {
    pub id: OfficeId,
    pub user_ids: Vec<UserId>,
    pub created_at: Timestamp,
}

/// オフィス詳細（読み取り専用の内観用）
#[derive(Debug, Clone)]
pub struct OfficeDetail {
    pub id: OfficeId,
    pub members: Vec<Member>,
    pub chat_message_count: usize,
    pub created_at: Timestamp,
}

/// オフィスレジストリのインターフェース
///
/// 状態遷移とその通知ファンアウトは同じオフィスロックの下で行う契約です。
/// これにより、あるオフィスの全メンバーのキューには状態変化が同じ順序で
/// 積まれます（配送順序の保証）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficeRegistry: Send + Sync {
    /// メンバーをオフィスに参加させる
    ///
    /// オフィスが無ければ作り、同じ userId の既存レコードは置換します
    /// (last join wins)。`joined_frame` を本人以外の既存メンバーへ配送し、
    /// 参加時点のスナップショットを返します。
    async fn join(&self, office_id: OfficeId, member: Member, joined_frame: Arc<String>)
    -> JoinSnapshot;

    /// メンバーをオフィスから退出させる
    ///
    /// レコードを所有する接続からの退出だけが有効です。退出後に
    /// `left_frame` を残りのメンバーへ配送し、最後の 1 人だった場合は
    /// オフィス自体を破棄します。削除したレコードを返します
    /// （stale な接続からの退出は `None`）。
    async fn leave(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        left_frame: Arc<String>,
    ) -> Option<Member>;

    /// 位置・向きを更新し、`frame` を本人以外へ配送する
    ///
    /// オフィスやメンバーが存在しない、または接続がレコードを所有して
    /// いない場合は何もせず `false` を返します。
    async fn update_position(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        position: Vec3,
        rotation: Vec3,
        frame: Arc<String>,
    ) -> bool;

    /// アバター設定を更新し、`frame` を本人以外へ配送する
    async fn update_customization(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        customization: Value,
        frame: Arc<String>,
    ) -> bool;

    /// チャットを履歴へ追記し、`frame` を本人を含む全員へ配送する
    async fn append_chat(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        message: ChatMessage,
        frame: Arc<String>,
    ) -> bool;

    /// 現存するオフィスの一覧を返す
    async fn list_offices(&self) -> Vec<OfficeSummary>;

    /// オフィスの詳細を返す（存在しなければ `None`）
    async fn get_office(&self, office_id: &OfficeId) -> Option<OfficeDetail>;
}
