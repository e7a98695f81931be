//! WebSocket connection handlers.
//!
//! 1 接続 = 1 セッション。読み取りループはこのタスク内で回し、
//! 送信は `pusher_loop` タスクに逃がします（受信の詰まりが配送順序に
//! 影響しないように）。join 済みかどうかはセッション文脈で追跡し、
//! ループを抜けた経路がどれであっても退出処理はちょうど一度だけ走ります。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ChatMessage, ChatText, ConnectionId, Member, OUTBOUND_QUEUE_CAPACITY, OfficeId,
        OutboundSender, Timestamp, UserId, Vec3, default_customization,
    },
    infrastructure::dto::websocket::{ChatMessageDto, ClientFrame, ServerFrame, UserDto},
    ui::state::AppState,
};
use nakaniwa_shared::time::get_unix_timestamp;

/// join 済みの接続が持つセッション文脈
///
/// 退出処理と position / chat の中継に必要な分だけを保持します。
struct SessionContext {
    user_id: UserId,
    user_name: String,
    office_id: OfficeId,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // 参加者の身元は接続後の join フレームで届く
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: frames fanned out by the registry
/// (and the join snapshot queued by this connection itself) are delivered to
/// this client's WebSocket connection in queue order.
fn pusher_loop(
    mut rx: mpsc::Receiver<Arc<String>>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.as_str().into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let connection_id = ConnectionId::generate();

    // この接続専用の送信キュー。満杯時のフレームはファンアウト側が落とす
    let (tx, rx) = mpsc::channel::<Arc<String>>(OUTBOUND_QUEUE_CAPACITY);
    let send_task = pusher_loop(rx, sender);

    tracing::info!("websocket connected: connection_id = {}", connection_id);

    let mut session: Option<SessionContext> = None;

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(
                    "websocket error: connection_id = {}, error = {}",
                    connection_id,
                    e
                );
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                process_frame(&state, &connection_id, &tx, &mut session, text.as_str()).await;
            }
            Message::Ping(_) => {
                tracing::debug!("received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::debug!("client requested close: connection_id = {}", connection_id);
                break;
            }
            _ => {}
        }
    }

    // どの経路でループを抜けても、送信タスクの停止と退出処理は一度だけ
    send_task.abort();

    if let Some(session) = session.take() {
        let left_frame = serde_json::to_string(&ServerFrame::UserLeft {
            user_id: session.user_id.as_str().to_string(),
        })
        .unwrap();
        state
            .leave_office_usecase
            .execute(
                &session.office_id,
                &session.user_id,
                &connection_id,
                left_frame,
            )
            .await;
    }

    tracing::info!("websocket disconnected: connection_id = {}", connection_id);
}

/// 受信フレーム 1 件を処理する
///
/// 読めないフレーム・未知の type・join 前の操作フレームは debug ログを
/// 出して読み捨てます（接続は維持）。
async fn process_frame(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    tx: &OutboundSender,
    session: &mut Option<SessionContext>,
    text: &str,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(
                "undecodable frame dropped: connection_id = {}, error = {}",
                connection_id,
                e
            );
            return;
        }
    };

    match frame {
        ClientFrame::Join {
            user_id,
            office_id,
            name,
            image,
            position,
            rotation,
            customization,
        } => {
            // officeId 欠落だけはプロトコル違反として error フレームを返す
            let Some(office_id) = office_id else {
                let error_json = serde_json::to_string(&ServerFrame::Error {
                    message: "officeId is required".to_string(),
                })
                .unwrap();
                let _ = tx.send(Arc::new(error_json)).await;
                return;
            };

            let office_id = match OfficeId::new(office_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("join with invalid officeId dropped: {}", e);
                    return;
                }
            };
            let user_id = match UserId::new(user_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("join with invalid userId dropped: {}", e);
                    return;
                }
            };

            // 同一接続からの 2 回目の join は前のオフィスからの退出として扱う
            if let Some(prev) = session.take() {
                let left_frame = serde_json::to_string(&ServerFrame::UserLeft {
                    user_id: prev.user_id.as_str().to_string(),
                })
                .unwrap();
                state
                    .leave_office_usecase
                    .execute(&prev.office_id, &prev.user_id, connection_id, left_frame)
                    .await;
            }

            let name = name.unwrap_or_else(|| user_id.as_str().to_string());
            let member = Member {
                user_id: user_id.clone(),
                name: name.clone(),
                image,
                position: position.unwrap_or_else(Vec3::spawn_default),
                rotation: rotation.unwrap_or_else(Vec3::zero),
                customization: customization.unwrap_or_else(default_customization),
                connection_id: connection_id.clone(),
                sender: tx.clone(),
                joined_at: Timestamp::new(get_unix_timestamp()),
            };

            // Domain Model から DTO への変換（既存メンバー向けの参加通知）
            let joined_json = serde_json::to_string(&ServerFrame::UserJoined {
                user: member.clone().into(),
            })
            .unwrap();

            let snapshot = state
                .join_office_usecase
                .execute(office_id.clone(), member, joined_json)
                .await;

            *session = Some(SessionContext {
                user_id,
                user_name: name,
                office_id,
            });

            // 参加時点のスナップショットを本人へ。自分のキューを経由させて
            // 以後のブロードキャストとの順序を保つ
            let users_json = serde_json::to_string(&ServerFrame::Users {
                users: snapshot.presence.into_iter().map(UserDto::from).collect(),
            })
            .unwrap();
            if tx.send(Arc::new(users_json)).await.is_err() {
                return;
            }

            // 履歴が空のときは chat-history を送らない
            if !snapshot.chat_history.is_empty() {
                let history_json = serde_json::to_string(&ServerFrame::ChatHistory {
                    messages: snapshot
                        .chat_history
                        .into_iter()
                        .map(ChatMessageDto::from)
                        .collect(),
                })
                .unwrap();
                let _ = tx.send(Arc::new(history_json)).await;
            }
        }

        ClientFrame::Position { position, rotation } => {
            let Some(session) = session.as_ref() else {
                tracing::debug!(
                    "position before join dropped: connection_id = {}",
                    connection_id
                );
                return;
            };

            let frame_json = serde_json::to_string(&ServerFrame::Position {
                user_id: session.user_id.as_str().to_string(),
                position,
                rotation,
            })
            .unwrap();

            if let Err(e) = state
                .update_presence_usecase
                .update_position(
                    &session.office_id,
                    &session.user_id,
                    connection_id,
                    position,
                    rotation,
                    frame_json,
                )
                .await
            {
                tracing::debug!("position update ignored: {}", e);
            }
        }

        ClientFrame::AvatarUpdate { customization } => {
            let Some(session) = session.as_ref() else {
                tracing::debug!(
                    "avatar-update before join dropped: connection_id = {}",
                    connection_id
                );
                return;
            };

            let frame_json = serde_json::to_string(&ServerFrame::AvatarUpdate {
                user_id: session.user_id.as_str().to_string(),
                customization: customization.clone(),
            })
            .unwrap();

            if let Err(e) = state
                .update_presence_usecase
                .update_customization(
                    &session.office_id,
                    &session.user_id,
                    connection_id,
                    customization,
                    frame_json,
                )
                .await
            {
                tracing::debug!("avatar update ignored: {}", e);
            }
        }

        ClientFrame::Chat { message } => {
            let Some(session) = session.as_ref() else {
                tracing::debug!(
                    "chat before join dropped: connection_id = {}",
                    connection_id
                );
                return;
            };

            let text = match ChatText::new(message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("invalid chat message dropped: {}", e);
                    return;
                }
            };

            // チャットだけはサーバが採番する（id とタイムスタンプ）
            let chat_message = ChatMessage::new(
                session.user_id.clone(),
                session.user_name.clone(),
                text,
                Timestamp::new(get_unix_timestamp()),
            );
            let chat_json = serde_json::to_string(&ServerFrame::Chat {
                message: chat_message.clone().into(),
            })
            .unwrap();

            if let Err(e) = state
                .send_chat_usecase
                .execute(&session.office_id, connection_id, chat_message, chat_json)
                .await
            {
                tracing::debug!("chat ignored: {}", e);
            }
        }
    }
}
