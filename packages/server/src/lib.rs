//! Realtime presence and chat relay for the Nakaniwa virtual office.
//!
//! The server accepts WebSocket connections, partitions them into independent
//! "office" rooms, tracks each participant's live avatar state, keeps a small
//! per-office chat history, and fans out state changes to the right subset of
//! connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
