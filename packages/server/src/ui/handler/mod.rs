//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_office_detail, get_offices, health_check};
pub use websocket::websocket_handler;
