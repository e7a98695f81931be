//! CLI presence and chat client for the Nakaniwa virtual office.
//!
//! サーバの WebSocket エンドポイントに接続してオフィスに入り、standard
//! input の行をチャットや移動コマンドとして送信します。wire のフレーム型は
//! nakaniwa-server の DTO をそのまま使うため、サーバと定義がずれません。

mod command;
mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
