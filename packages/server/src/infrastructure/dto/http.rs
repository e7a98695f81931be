//! HTTP API response DTOs

use serde::Serialize;

use super::websocket::UserDto;

/// `GET /api/offices` の 1 要素
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeSummaryDto {
    pub id: String,
    pub user_count: usize,
    pub user_ids: Vec<String>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// `GET /api/offices/{office_id}` の応答
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDetailDto {
    pub id: String,
    pub users: Vec<UserDto>,
    pub chat_message_count: usize,
    /// RFC 3339 (UTC)
    pub created_at: String,
}
