//! UseCase 層のエラー定義

use thiserror::Error;

/// プレゼンス更新（position / avatar-update）のエラー
#[derive(Debug, Error, PartialEq)]
pub enum PresenceUpdateError {
    /// 送信者がオフィスのメンバーでない、またはレコードを所有していない
    /// （leave と競合した遅延フレームはここに落ちる）
    #[error("user '{0}' is not a member of office '{1}'")]
    NotAMember(String, String),
}

/// チャット送信のエラー
#[derive(Debug, Error, PartialEq)]
pub enum SendChatError {
    /// 送信者がオフィスのメンバーでない
    #[error("user '{0}' is not a member of office '{1}'")]
    NotAMember(String, String),
}

/// オフィス詳細取得のエラー
#[derive(Debug, Error, PartialEq)]
pub enum GetOfficeDetailError {
    /// オフィスが現存しない
    #[error("office not found")]
    OfficeNotFound,
}
