//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use nakaniwa_server::infrastructure::dto::websocket::{ClientFrame, ServerFrame};

use crate::command::{Command, parse_line};
use crate::error::ClientError;
use crate::formatter::MessageFormatter;
use crate::ui::redisplay_prompt;

/// Run one WebSocket client session: connect, join, then relay between
/// stdin and the server until either side closes.
pub async fn run_client_session(
    url: &str,
    office_id: &str,
    user_id: &str,
    name: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", url);
    println!(
        "\nYou are '{}' ({}) in office '{}'.\n\
         Type a message to chat, '/move <x> <y> <z> [ry]' to walk around, '/quit' to leave.\n",
        name, user_id, office_id
    );

    let (mut write, mut read) = ws_stream.split();

    // 最初に join を送る。これが通るまでサーバは他のフレームを読み捨てる。
    let join = ClientFrame::Join {
        user_id: user_id.to_string(),
        office_id: Some(office_id.to_string()),
        name: Some(name.to_string()),
        image: None,
        position: None,
        rotation: None,
        customization: None,
    };
    let join_json = serde_json::to_string(&join)
        .map_err(|e| ClientError::ConnectionError(format!("failed to encode join: {e}")))?;
    write
        .send(Message::Text(join_json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // Clone identifiers for the read task
    let office_id_for_read = office_id.to_string();
    let user_id_for_read = user_id.to_string();

    // Spawn a task to handle incoming frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerFrame>(text.as_str()) {
                        Ok(frame) => {
                            handle_server_frame(frame, &office_id_for_read, &user_id_for_read);
                        }
                        // 知らないフレームは生のまま見せる
                        Err(_) => {
                            print!("{}", MessageFormatter::format_raw_message(text.as_str()));
                            redisplay_prompt(&user_id_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone the user_id for the input loop
    let user_id = user_id.to_string();
    let user_id_for_prompt = user_id.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to interpret input lines and send frames
    let user_id_for_write = user_id.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let command = match parse_line(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("\n! {}\n", e);
                    redisplay_prompt(&user_id_for_write);
                    continue;
                }
            };

            // チャットは自分にもエコーされるので、送信確認は /move だけでよい
            let (frame, confirmation) = match command {
                Command::Quit => {
                    tracing::info!("Leaving the office");
                    break;
                }
                Command::Chat(text) => (ClientFrame::Chat { message: text }, None),
                Command::Move { position, rotation } => {
                    let note = MessageFormatter::format_move_confirmation(&position);
                    (ClientFrame::Position { position, rotation }, Some(note))
                }
            };

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send frame: {}", e);
                write_error = true;
                break;
            }

            if let Some(note) = confirmation {
                print!("\n{}", note);
                redisplay_prompt(&user_id_for_write);
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(ClientError::ConnectionError("connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(ClientError::ConnectionError("connection lost".to_string()));
            }
        }
    }

    Ok(())
}

/// サーバフレームを 1 件表示する。
///
/// position / avatar-update は毎秒何件も届きうるのでプロンプトを荒らさず、
/// `RUST_LOG=debug` のときだけログに出します。
fn handle_server_frame(frame: ServerFrame, office_id: &str, my_user_id: &str) {
    match frame {
        ServerFrame::Users { users } => {
            print!("{}", MessageFormatter::format_office_joined(office_id, &users));
            redisplay_prompt(my_user_id);
        }
        ServerFrame::ChatHistory { messages } => {
            print!("{}", MessageFormatter::format_chat_history(&messages));
            redisplay_prompt(my_user_id);
        }
        ServerFrame::UserJoined { user } => {
            print!("{}", MessageFormatter::format_user_joined(&user));
            redisplay_prompt(my_user_id);
        }
        ServerFrame::UserLeft { user_id } => {
            print!("{}", MessageFormatter::format_user_left(&user_id));
            redisplay_prompt(my_user_id);
        }
        ServerFrame::Chat { message } => {
            print!("{}", MessageFormatter::format_chat_message(&message));
            redisplay_prompt(my_user_id);
        }
        ServerFrame::Position {
            user_id, position, ..
        } => {
            tracing::debug!(
                "{} moved to ({:.1}, {:.1}, {:.1})",
                user_id,
                position.x,
                position.y,
                position.z
            );
        }
        ServerFrame::AvatarUpdate { user_id, .. } => {
            tracing::debug!("{} updated their avatar", user_id);
        }
        ServerFrame::Error { message } => {
            print!("{}", MessageFormatter::format_server_error(&message));
            redisplay_prompt(my_user_id);
        }
    }
}
