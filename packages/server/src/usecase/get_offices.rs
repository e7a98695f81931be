//! UseCase: オフィス一覧取得（読み取り専用の内観用）

use std::sync::Arc;

use crate::domain::{OfficeRegistry, OfficeSummary};

/// オフィス一覧取得のユースケース
pub struct GetOfficesUseCase {
    registry: Arc<dyn OfficeRegistry>,
}

impl GetOfficesUseCase {
    /// 新しい GetOfficesUseCase を作成
    pub fn new(registry: Arc<dyn OfficeRegistry>) -> Self {
        Self { registry }
    }

    /// 現存するオフィスのサマリを ID 順で返す
    pub async fn execute(&self) -> Vec<OfficeSummary> {
        self.registry.list_offices().await
    }
}
