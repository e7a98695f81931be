//! UseCase: チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - チャット送信処理（履歴への追記、送信者本人を含む全員への配送）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証: チャットだけは送信者本人にもエコーされる
//!   （クライアントはサーバ採番の id / timestamp を受け取って表示する）
//! - 履歴の追記が配送と同じロックの下で行われ、後から参加した人の
//!   chat-history と齟齬が出ないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系: チャット送信とエコー・配送
//! - 異常系: メンバーでない送信者（NotAMember）
//! - エッジケース: 送信者のみが接続している場合（エコーのみ）

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, OfficeId, OfficeRegistry};

use super::error::SendChatError;

/// チャット送信のユースケース
pub struct SendChatUseCase {
    /// Registry（共有状態アクセスの抽象化）
    registry: Arc<dyn OfficeRegistry>,
}

impl SendChatUseCase {
    /// 新しい SendChatUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// チャット送信を実行
    ///
    /// # Arguments
    ///
    /// * `office_id` - 対象のオフィス ID（Domain Model）
    /// * `connection_id` - 送信元接続の ID
    /// * `message` - 採番済みのチャットメッセージ（Domain Model）
    /// * `chat_frame` - 全員へ配る JSON フレーム（DTO 層で生成されたもの）
    pub async fn execute(
        &self,
        office_id: &OfficeId,
        connection_id: &ConnectionId,
        message: ChatMessage,
        chat_frame: String,
    ) -> Result<(), SendChatError> {
        let user_id = message.user_id.clone();
        let appended = self
            .registry
            .append_chat(
                office_id,
                &user_id,
                connection_id,
                message,
                Arc::new(chat_frame),
            )
            .await;

        if appended {
            Ok(())
        } else {
            Err(SendChatError::NotAMember(
                user_id.into_string(),
                office_id.as_str().to_string(),
            ))
        }
    }
}
