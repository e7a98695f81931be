//! Message formatting utilities for client display.

use chrono::DateTime;

use nakaniwa_server::domain::Vec3;
use nakaniwa_server::infrastructure::dto::websocket::{ChatMessageDto, UserDto};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the roster received right after joining an office.
    ///
    /// サーバが返す一覧は「自分以外」のメンバーなので、(me) のような
    /// マークは不要です。
    pub fn format_office_joined(office_id: &str, users: &[UserDto]) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Office '{}':\n", office_id));

        if users.is_empty() {
            output.push_str("(No one else is here)\n");
        } else {
            for user in users {
                output.push_str(&format!(
                    "{} ({}) at {}\n",
                    user.name,
                    user.id,
                    format_position(&user.position)
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the chat history replayed to a late joiner.
    pub fn format_chat_history(messages: &[ChatMessageDto]) -> String {
        if messages.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str("\n--- recent messages ---\n");
        for message in messages {
            output.push_str(&chat_line(message));
            output.push('\n');
        }
        output.push_str("-----------------------\n");
        output
    }

    /// Format a user-joined notification
    pub fn format_user_joined(user: &UserDto) -> String {
        format!("\n+ {} ({}) entered the office\n", user.name, user.id)
    }

    /// Format a user-left notification
    pub fn format_user_left(user_id: &str) -> String {
        format!("\n- {} left the office\n", user_id)
    }

    /// Format a single chat message for live display
    pub fn format_chat_message(message: &ChatMessageDto) -> String {
        format!("\n{}\n", chat_line(message))
    }

    /// Format a confirmation after sending a `/move` command
    pub fn format_move_confirmation(position: &Vec3) -> String {
        format!("moved to {}\n", format_position(position))
    }

    /// Format an error frame sent by the server
    pub fn format_server_error(message: &str) -> String {
        format!("\n! server error: {}\n", message)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn format_position(position: &Vec3) -> String {
    format!("({:.1}, {:.1}, {:.1})", position.x, position.y, position.z)
}

/// `[HH:MM:SS] @name: text` 形式の 1 行。時刻は UTC。
fn chat_line(message: &ChatMessageDto) -> String {
    format!(
        "[{}] @{}: {}",
        short_time(message.timestamp),
        message.user_name,
        message.message
    )
}

/// Unix epoch ミリ秒を UTC の HH:MM:SS にする。範囲外はそのまま数値で返す。
fn short_time(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(datetime) => datetime.format("%H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}
