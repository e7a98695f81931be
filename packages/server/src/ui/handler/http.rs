//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{OfficeDetailDto, OfficeSummaryDto},
        websocket::UserDto,
    },
    ui::state::AppState,
    usecase::GetOfficeDetailError,
};
use nakaniwa_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live offices
pub async fn get_offices(State(state): State<Arc<AppState>>) -> Json<Vec<OfficeSummaryDto>> {
    let summaries = state.get_offices_usecase.execute().await;

    // Domain Model から DTO への変換
    let office_summaries: Vec<OfficeSummaryDto> = summaries
        .into_iter()
        .map(|office| OfficeSummaryDto {
            id: office.id.into_string(),
            user_count: office.user_ids.len(),
            user_ids: office
                .user_ids
                .into_iter()
                .map(|user_id| user_id.into_string())
                .collect(),
            created_at: timestamp_to_rfc3339(office.created_at.value()),
        })
        .collect();

    Json(office_summaries)
}

/// Get office detail by ID
pub async fn get_office_detail(
    State(state): State<Arc<AppState>>,
    Path(office_id): Path<String>,
) -> Result<Json<OfficeDetailDto>, StatusCode> {
    match state.get_office_detail_usecase.execute(office_id).await {
        Ok(office) => {
            // Domain Model から DTO への変換
            let office_detail = OfficeDetailDto {
                id: office.id.into_string(),
                users: office.members.into_iter().map(UserDto::from).collect(),
                chat_message_count: office.chat_message_count,
                created_at: timestamp_to_rfc3339(office.created_at.value()),
            };
            Ok(Json(office_detail))
        }
        Err(GetOfficeDetailError::OfficeNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
