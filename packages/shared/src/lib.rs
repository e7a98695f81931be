//! Shared utilities for the Nakaniwa virtual office workspace.
//!
//! This crate holds the pieces both the server and the CLI client need:
//! logger setup and time handling.

pub mod logger;
pub mod time;
