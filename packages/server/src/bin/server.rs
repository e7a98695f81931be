//! Realtime presence and chat relay for browser-based virtual offices.
//!
//! Partitions WebSocket clients into offices, tracks avatar presence and
//! relays state changes and chat to everyone else in the same office.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin nakaniwa-server
//! cargo run --bin nakaniwa-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use nakaniwa_server::{
    infrastructure::registry::InMemoryOfficeRegistry,
    ui::Server,
    usecase::{
        GetOfficeDetailUseCase, GetOfficesUseCase, JoinOfficeUseCase, LeaveOfficeUseCase,
        SendChatUseCase, UpdatePresenceUseCase,
    },
};
use nakaniwa_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Presence and chat relay for virtual offices", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock
    // 2. Registry
    // 3. UseCases
    // 4. Server

    // 1. Create Clock (system time)
    let clock = Arc::new(SystemClock);

    // 2. Create Registry (in-memory office database)
    let registry = Arc::new(InMemoryOfficeRegistry::new(clock));

    // 3. Create UseCases
    let join_office_usecase = Arc::new(JoinOfficeUseCase::new(registry.clone()));
    let leave_office_usecase = Arc::new(LeaveOfficeUseCase::new(registry.clone()));
    let update_presence_usecase = Arc::new(UpdatePresenceUseCase::new(registry.clone()));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(registry.clone()));
    let get_offices_usecase = Arc::new(GetOfficesUseCase::new(registry.clone()));
    let get_office_detail_usecase = Arc::new(GetOfficeDetailUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
        join_office_usecase,
        leave_office_usecase,
        update_presence_usecase,
        send_chat_usecase,
        get_offices_usecase,
        get_office_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
