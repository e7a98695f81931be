//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use uuid::Uuid;

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// 引数不正はやり直しても直らないため、再接続ループに入らず終了します。
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidArgument(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Generate a guest identity for use when `--user-id` is omitted.
///
/// ブラウザクライアントが匿名ユーザーに割り当てるのと同じ形
/// （`anon-` + 短いランダム文字列、表示名は `Guest <0-999>`）に合わせます。
pub fn generate_guest_identity() -> (String, String) {
    guest_identity_from(Uuid::new_v4())
}

fn guest_identity_from(uuid: Uuid) -> (String, String) {
    let hex = uuid.simple().to_string();
    let user_id = format!("anon-{}", &hex[..9]);
    let name = format!("Guest {}", uuid.as_u128() % 1000);
    (user_id, name)
}
