//! Error types for the presence client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// 起動引数が不正（再接続しても直らないので即終了する）
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 接続の確立に失敗した、または確立済みの接続が失われた
    #[error("connection error: {0}")]
    ConnectionError(String),
}
