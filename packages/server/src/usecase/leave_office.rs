//! UseCase: オフィス退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveOfficeUseCase::execute() メソッド
//! - 退出処理（レコード削除、残メンバーへの通知、空オフィスの破棄）
//!
//! ### なぜこのテストが必要か
//! - 切断経路（明示 close・異常切断）は必ずここに合流するため、
//!   退出が一度だけ・正しい相手に通知されることを保証する
//! - 再接続に敗れた古い接続の切断が、勝った接続のレコードを
//!   消さないこと（last join wins の後始末）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系: メンバーの退出と通知
//! - エッジケース: レコードを所有しない接続からの退出（no-op）

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ConnectionId, Member, OfficeId, OfficeRegistry, UserId};

/// オフィス退出のユースケース
pub struct LeaveOfficeUseCase {
    /// Registry（共有状態アクセスの抽象化）
    registry: Arc<dyn OfficeRegistry>,
}

impl LeaveOfficeUseCase {
    /// 新しい LeaveOfficeUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// オフィス退出を実行
    ///
    /// # Arguments
    ///
    /// * `office_id` - 退出元のオフィス ID（Domain Model）
    /// * `user_id` - 退出者の ID（Domain Model）
    /// * `connection_id` - 退出を要求した接続の ID
    /// * `left_frame` - 残りのメンバーへ配る JSON フレーム（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Some(Member)` - 削除されたレコード
    /// * `None` - 接続がレコードを所有していなかった（通知も配られない）
    pub async fn execute(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        left_frame: String,
    ) -> Option<Member> {
        let removed = self
            .registry
            .leave(office_id, user_id, connection_id, Arc::new(left_frame))
            .await;

        match &removed {
            Some(_) => {
                info!(
                    "user left: user_id = {}, office_id = {}",
                    user_id, office_id
                );
            }
            None => {
                debug!(
                    "stale leave ignored: user_id = {}, office_id = {}, connection_id = {}",
                    user_id, office_id, connection_id
                );
            }
        }
        removed
    }
}
