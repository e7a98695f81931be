//! UseCase: オフィス詳細取得（読み取り専用の内観用）

use std::sync::Arc;

use crate::domain::{OfficeDetail, OfficeId, OfficeRegistry};

use super::error::GetOfficeDetailError;

/// オフィス詳細取得のユースケース
pub struct GetOfficeDetailUseCase {
    registry: Arc<dyn OfficeRegistry>,
}

impl GetOfficeDetailUseCase {
    /// 新しい GetOfficeDetailUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// オフィス詳細を取得
    ///
    /// ID として不正な文字列（空・長過ぎる）は「現存しない」と同じ扱いで
    /// `OfficeNotFound` を返します。
    pub async fn execute(&self, office_id: String) -> Result<OfficeDetail, GetOfficeDetailError> {
        let office_id =
            OfficeId::new(office_id).map_err(|_| GetOfficeDetailError::OfficeNotFound)?;
        self.registry
            .get_office(&office_id)
            .await
            .ok_or(GetOfficeDetailError::OfficeNotFound)
    }
}
