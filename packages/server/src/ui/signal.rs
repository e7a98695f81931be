//! Graceful shutdown signal handling.

use tokio::signal;

/// ctrl-c または SIGTERM を待つ
///
/// `axum::serve(...).with_graceful_shutdown(shutdown_signal())` に渡して
/// 使います。シグナルハンドラの登録失敗は起動時不変条件の破れなので
/// panic で落とします。
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received ctrl-c, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
