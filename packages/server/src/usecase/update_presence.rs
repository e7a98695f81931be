//! UseCase: プレゼンス更新処理（position / avatar-update）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdatePresenceUseCase::update_position() / update_customization()
//! - 高頻度の位置更新と低頻度のアバター更新の中継
//!
//! ### なぜこのテストが必要か
//! - 更新がレコードに反映され、送信者以外に中継されることを保証する
//! - メンバーでない（leave 競合の遅延フレーム）送信者の更新が
//!   no-op エラーとして報告されることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系: メンバーによる更新と中継
//! - 異常系: 非メンバー・stale 接続からの更新（NotAMember）

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ConnectionId, OfficeId, OfficeRegistry, UserId, Vec3};

use super::error::PresenceUpdateError;

/// プレゼンス更新のユースケース
pub struct UpdatePresenceUseCase {
    /// Registry（共有状態アクセスの抽象化）
    registry: Arc<dyn OfficeRegistry>,
}

impl UpdatePresenceUseCase {
    /// 新しい UpdatePresenceUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// 位置・向きの更新を実行
    ///
    /// # Arguments
    ///
    /// * `office_id` - 対象のオフィス ID（Domain Model）
    /// * `user_id` - 送信者の ID（Domain Model）
    /// * `connection_id` - 送信元接続の ID
    /// * `position` / `rotation` - 新しい座標と向き
    /// * `frame` - 他メンバーへ中継する JSON フレーム（DTO 層で生成されたもの）
    pub async fn update_position(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        position: Vec3,
        rotation: Vec3,
        frame: String,
    ) -> Result<(), PresenceUpdateError> {
        let applied = self
            .registry
            .update_position(
                office_id,
                user_id,
                connection_id,
                position,
                rotation,
                Arc::new(frame),
            )
            .await;

        if applied {
            Ok(())
        } else {
            Err(PresenceUpdateError::NotAMember(
                user_id.as_str().to_string(),
                office_id.as_str().to_string(),
            ))
        }
    }

    /// アバター設定の更新を実行（引数と通知規則は update_position と同じ）
    pub async fn update_customization(
        &self,
        office_id: &OfficeId,
        user_id: &UserId,
        connection_id: &ConnectionId,
        customization: Value,
        frame: String,
    ) -> Result<(), PresenceUpdateError> {
        let applied = self
            .registry
            .update_customization(office_id, user_id, connection_id, customization, Arc::new(frame))
            .await;

        if applied {
            Ok(())
        } else {
            Err(PresenceUpdateError::NotAMember(
                user_id.as_str().to_string(),
                office_id.as_str().to_string(),
            ))
        }
    }
}
