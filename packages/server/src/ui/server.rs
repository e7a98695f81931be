//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    GetOfficeDetailUseCase, GetOfficesUseCase, JoinOfficeUseCase, LeaveOfficeUseCase,
    SendChatUseCase, UpdatePresenceUseCase,
};

use super::{
    handler::{get_office_detail, get_offices, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Presence and chat relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_office_usecase,
///     leave_office_usecase,
///     update_presence_usecase,
///     send_chat_usecase,
///     get_offices_usecase,
///     get_office_detail_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinOfficeUseCase（オフィス参加のユースケース）
    join_office_usecase: Arc<JoinOfficeUseCase>,
    /// LeaveOfficeUseCase（オフィス退出のユースケース）
    leave_office_usecase: Arc<LeaveOfficeUseCase>,
    /// UpdatePresenceUseCase（プレゼンス更新のユースケース）
    update_presence_usecase: Arc<UpdatePresenceUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    send_chat_usecase: Arc<SendChatUseCase>,
    /// GetOfficesUseCase（オフィス一覧取得のユースケース）
    get_offices_usecase: Arc<GetOfficesUseCase>,
    /// GetOfficeDetailUseCase（オフィス詳細取得のユースケース）
    get_office_detail_usecase: Arc<GetOfficeDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        join_office_usecase: Arc<JoinOfficeUseCase>,
        leave_office_usecase: Arc<LeaveOfficeUseCase>,
        update_presence_usecase: Arc<UpdatePresenceUseCase>,
        send_chat_usecase: Arc<SendChatUseCase>,
        get_offices_usecase: Arc<GetOfficesUseCase>,
        get_office_detail_usecase: Arc<GetOfficeDetailUseCase>,
    ) -> Self {
        Self {
            join_office_usecase,
            leave_office_usecase,
            update_presence_usecase,
            send_chat_usecase,
            get_offices_usecase,
            get_office_detail_usecase,
        }
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await?;
        Ok(())
    }

    /// Serve on an already-bound listener
    ///
    /// ポート 0 で bind したリスナーを渡せるため、テストからは
    /// こちらを使います。
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app_state = Arc::new(AppState {
            join_office_usecase: self.join_office_usecase,
            leave_office_usecase: self.leave_office_usecase,
            update_presence_usecase: self.update_presence_usecase,
            send_chat_usecase: self.send_chat_usecase,
            get_offices_usecase: self.get_offices_usecase,
            get_office_detail_usecase: self.get_office_detail_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/api/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/offices", get(get_offices))
            .route("/api/offices/{office_id}", get(get_office_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let local_addr = listener.local_addr()?;
        tracing::info!("presence relay listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/api/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
