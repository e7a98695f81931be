//! ドメイン層のエラー型定義

use thiserror::Error;

/// Value Object の生成時に発生するドメインエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// User ID が空
    #[error("user id must not be empty")]
    EmptyUserId,

    /// User ID が長すぎる
    #[error("user id must be at most {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// Office ID が空
    #[error("office id must not be empty")]
    EmptyOfficeId,

    /// Office ID が長すぎる
    #[error("office id must be at most {max} characters (got {actual})")]
    OfficeIdTooLong { max: usize, actual: usize },

    /// チャット本文が空
    #[error("chat text must not be empty")]
    EmptyChatText,

    /// チャット本文が長すぎる
    #[error("chat text must be at most {max} characters (got {actual})")]
    ChatTextTooLong { max: usize, actual: usize },
}
