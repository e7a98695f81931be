//! Input line parsing for the interactive prompt.
//!
//! 先頭が `/` の行はコマンド、それ以外はそのままチャット本文として扱います。

use thiserror::Error;

use nakaniwa_server::domain::Vec3;

/// 入力行の解釈結果
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// チャット送信
    Chat(String),
    /// 自分の位置と向きの更新: `/move <x> <y> <z> [ry]`
    Move { position: Vec3, rotation: Vec3 },
    /// セッション終了: `/quit`
    Quit,
}

/// コマンド行の解釈エラー
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}' (available: /move, /quit)")]
    UnknownCommand(String),

    #[error("usage: /move <x> <y> <z> [ry]")]
    InvalidMove,
}

/// Parse a single input line into a [`Command`].
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    match parts.next() {
        Some("quit" | "exit") => Ok(Command::Quit),
        Some("move") => parse_move(parts),
        Some(other) => Err(CommandError::UnknownCommand(format!("/{other}"))),
        None => Err(CommandError::UnknownCommand("/".to_string())),
    }
}

/// `/move` の引数は x y z の 3 値、または水平回転 ry を足した 4 値
fn parse_move<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Command, CommandError> {
    let args: Vec<f64> = parts
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| CommandError::InvalidMove)?;

    let (position, ry) = match args.as_slice() {
        [x, y, z] => (Vec3 { x: *x, y: *y, z: *z }, 0.0),
        [x, y, z, ry] => (Vec3 { x: *x, y: *y, z: *z }, *ry),
        _ => return Err(CommandError::InvalidMove),
    };

    Ok(Command::Move {
        position,
        rotation: Vec3 {
            x: 0.0,
            y: ry,
            z: 0.0,
        },
    })
}
