//! Client execution logic with reconnection support.

use std::time::Duration;

use nakaniwa_server::domain::{OfficeId, UserId};

use crate::domain::{generate_guest_identity, should_attempt_reconnect, should_exit_immediately};
use crate::error::ClientError;
use crate::session::run_client_session;

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 3;

/// Run the WebSocket client with reconnection logic
///
/// `user_id` を省略するとゲスト識別子を生成し、`name` を省略すると
/// user_id をそのまま表示名として使います。
pub async fn run_client(
    url: String,
    office_id: String,
    user_id: Option<String>,
    name: Option<String>,
) -> Result<(), ClientError> {
    // 識別子を確定し、サーバと同じルールで先に検証しておく。
    // 不正な ID の join はサーバ側で黙って捨てられるため、ここで
    // 弾かないと「何も起きない」接続になってしまう。
    let (user_id, name) = match user_id {
        Some(user_id) => {
            let name = name.unwrap_or_else(|| user_id.clone());
            (user_id, name)
        }
        None => {
            let (guest_id, guest_name) = generate_guest_identity();
            (guest_id, name.unwrap_or(guest_name))
        }
    };
    OfficeId::new(office_id.clone()).map_err(|e| ClientError::InvalidArgument(e.to_string()))?;
    UserId::new(user_id.clone()).map_err(|e| ClientError::InvalidArgument(e.to_string()))?;

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' in office '{}' (attempt {}/{})",
            url,
            user_id,
            office_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &office_id, &user_id, &name).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the session ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
