//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    GetOfficeDetailUseCase, GetOfficesUseCase, JoinOfficeUseCase, LeaveOfficeUseCase,
    SendChatUseCase, UpdatePresenceUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinOfficeUseCase（オフィス参加のユースケース）
    pub join_office_usecase: Arc<JoinOfficeUseCase>,
    /// LeaveOfficeUseCase（オフィス退出のユースケース）
    pub leave_office_usecase: Arc<LeaveOfficeUseCase>,
    /// UpdatePresenceUseCase（プレゼンス更新のユースケース）
    pub update_presence_usecase: Arc<UpdatePresenceUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// GetOfficesUseCase（オフィス一覧取得のユースケース）
    pub get_offices_usecase: Arc<GetOfficesUseCase>,
    /// GetOfficeDetailUseCase（オフィス詳細取得のユースケース）
    pub get_office_detail_usecase: Arc<GetOfficeDetailUseCase>,
}
