//! Entry point for `udp-chat`.
//!
//! Parses CLI arguments and hands two validated ports to the session
//! layer; `main.rs` owns only process setup (logging, argument parsing)
//! and the exit status.

use anyhow::Context;
use clap::Parser;

use udp_chat::config::ChatConfig;
use udp_chat::session::ChatSession;

/// Two-way UDP chat over loopback.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Local port to bind (1024-65535).
    local_port: u16,

    /// Peer's port.  When omitted, the peer is learned from the first
    /// inbound message.
    peer_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::init();

    let cli = Cli::parse();

    let config = match ChatConfig::new(cli.local_port, cli.peer_port) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let session = ChatSession::start(config)
        .await
        .context("failed to start chat session")?;

    let status = session
        .run_until_interrupt()
        .await
        .context("failed to wait for interrupt")?;
    std::process::exit(status);
}
