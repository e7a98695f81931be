//! CLI presence client for the Nakaniwa virtual office.
//!
//! Connects to the relay's WebSocket endpoint, joins an office, and sends
//! chat messages and `/move` commands from stdin. Automatically reconnects
//! on disconnection (max 5 attempts with 3 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin nakaniwa-client -- --office main --user-id alice --name Alice
//! cargo run --bin nakaniwa-client -- -o main
//! ```

use clap::Parser;

use nakaniwa_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Presence and chat client for the Nakaniwa virtual office", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/api/ws")]
    url: String,

    /// Office to join
    #[arg(short = 'o', long, default_value = "global")]
    office: String,

    /// User ID (omit to join as a guest)
    #[arg(long)]
    user_id: Option<String>,

    /// Display name (defaults to the user ID)
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = nakaniwa_client::run_client(args.url, args.office, args.user_id, args.name).await
    {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
