//! UseCase: オフィス参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinOfficeUseCase::execute() メソッド
//! - 参加処理（オフィスの遅延生成、スナップショット返却、参加通知）
//!
//! ### なぜこのテストが必要か
//! - join 応答（users / chat-history）の材料となるスナップショットが
//!   「参加時点の他メンバー」と「保持中の履歴」を正しく写すことを保証する
//! - last join wins: 同じ userId の再参加が重複レコードを作らないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系: 最初の参加（スナップショットは空）・2 人目以降の参加
//! - エッジケース: 同じ userId の再接続（置換）

use std::sync::Arc;

use tracing::info;

use crate::domain::{JoinSnapshot, Member, OfficeId, OfficeRegistry};

/// オフィス参加のユースケース
pub struct JoinOfficeUseCase {
    /// Registry（共有状態アクセスの抽象化）
    registry: Arc<dyn OfficeRegistry>,
}

impl JoinOfficeUseCase {
    /// 新しい JoinOfficeUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// オフィス参加を実行
    ///
    /// # Arguments
    ///
    /// * `office_id` - 参加先のオフィス ID（Domain Model）
    /// * `member` - 参加者のレコード（送信チャンネルを含む）
    /// * `joined_frame` - 既存メンバーへ配る JSON フレーム（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `JoinSnapshot` - 参加時点の他メンバーとチャット履歴
    pub async fn execute(
        &self,
        office_id: OfficeId,
        member: Member,
        joined_frame: String,
    ) -> JoinSnapshot {
        let user_id = member.user_id.clone();
        let snapshot = self
            .registry
            .join(office_id.clone(), member, Arc::new(joined_frame))
            .await;

        info!(
            "user joined: user_id = {}, office_id = {}, members_before = {}",
            user_id,
            office_id,
            snapshot.presence.len()
        );
        snapshot
    }
}
