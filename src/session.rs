//! Chat session: the three concurrent activities and their orchestration.
//!
//! # Architecture
//!
//! ```text
//!  console ──▶ input_loop ──▶ Mailbox ──▶ transmit_loop ──▶ Endpoint ──▶ peer
//!                            (1 slot)    (waits for peer)      │
//!  console ◀── receive_loop ◀─────────────────────────────────┘
//!                 │
//!                 └──▶ Endpoint peer cell (learned from first datagram)
//!
//!  Lifecycle ──stopped()──▶ every loop, at its next await boundary
//! ```
//!
//! [`ChatSession::start`] spawns the three loops as tokio tasks.
//! [`ChatSession::run_until_interrupt`] parks the main task on Ctrl+C,
//! then drives the teardown sequence: flip the lifecycle state, join all
//! three tasks, mark the session stopped, and hand back the interrupt
//! signal's number as the process exit status.  Ordering matters — the
//! stop signal precedes the joins, and the socket is only dropped after
//! no loop can touch it.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::task::JoinHandle;

use crate::config::ChatConfig;
use crate::endpoint::{Endpoint, EndpointError};
use crate::input::{input_loop, prompt};
use crate::lifecycle::{Lifecycle, LifecycleHandle};
use crate::mailbox::Mailbox;
use crate::message::{Message, MAX_MESSAGE_LEN};

/// Receive buffer size: one maximum-length message plus room for a
/// trailing NUL from peers that send NUL-terminated text.
const RECV_BUF_LEN: usize = MAX_MESSAGE_LEN + 1;

/// Exit status used when the run ends on Ctrl+C, per shell convention.
const SIGINT: i32 = 2;

// ---------------------------------------------------------------------------
// Transmit loop
// ---------------------------------------------------------------------------

/// Drain the mailbox into the endpoint, one datagram per message.
///
/// No datagram may leave before the peer is known, so the loop first
/// awaits the peer cell.  Messages deposited in the meantime overwrite
/// each other in the single slot; when the peer appears only the newest
/// one goes out.  Send failures are reported and the loop continues.
pub async fn transmit_loop(
    endpoint: Arc<Endpoint>,
    mailbox: Arc<Mailbox>,
    mut lifecycle: LifecycleHandle,
) {
    let peer = tokio::select! {
        peer = endpoint.wait_for_peer() => peer,
        _ = lifecycle.stopped() => return,
    };
    log::debug!("[send] peer known, transmitting to {peer}");

    loop {
        let message = tokio::select! {
            message = mailbox.take() => message,
            _ = lifecycle.stopped() => return,
        };
        match endpoint.send(&message, peer).await {
            Ok(()) => log::debug!("[send] → {} byte(s) to {peer}", message.as_bytes().len()),
            Err(e) => log::warn!("[send] {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Receive loop
// ---------------------------------------------------------------------------

/// Print inbound datagrams, learning the peer from the first one.
///
/// The blocking receive is raced against shutdown, so the loop needs no
/// timeout of its own.  Receive failures are reported and the loop
/// continues.
pub async fn receive_loop(endpoint: Arc<Endpoint>, mut lifecycle: LifecycleHandle) {
    let mut buf = [0u8; RECV_BUF_LEN];

    loop {
        let received = tokio::select! {
            received = endpoint.recv(&mut buf) => received,
            _ = lifecycle.stopped() => return,
        };

        match received {
            Ok((n, source)) => {
                if endpoint.set_peer(source) {
                    log::info!("[recv] learned peer {source}");
                }
                // Fixed after learning; a datagram from elsewhere is still
                // printed under the established peer's label.
                let port = endpoint.peer().map(|addr| addr.port()).unwrap_or_else(|| source.port());
                let message = Message::from_datagram(&buf[..n]);
                println!("[{port}]: {message}");
                prompt();
            }
            Err(e) => log::warn!("[recv] {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

/// A running chat endpoint: three spawned loops plus their lifecycle.
pub struct ChatSession {
    lifecycle: Lifecycle,
    endpoint: Arc<Endpoint>,
    mailbox: Arc<Mailbox>,
    input: JoinHandle<()>,
    transmit: JoinHandle<()>,
    receive: JoinHandle<()>,
}

impl ChatSession {
    /// Bind the endpoint and spawn the input, transmit, and receive loops.
    ///
    /// When `config` carries a peer port, the peer cell is fixed here and
    /// auto-learning never gets a chance to write it.
    pub async fn start(config: ChatConfig) -> Result<Self, EndpointError> {
        let endpoint = Arc::new(Endpoint::bind(config.local_port).await?);
        if let Some(peer) = config.peer_addr() {
            endpoint.set_peer(peer);
            log::info!("[chat] peer fixed at {peer}");
        }
        log::info!("[chat] listening on {}", endpoint.local_addr());

        let mailbox = Arc::new(Mailbox::new());
        let lifecycle = Lifecycle::new();

        let input = tokio::spawn(input_loop(
            BufReader::new(tokio::io::stdin()),
            Arc::clone(&mailbox),
            lifecycle.handle(),
        ));
        let transmit = tokio::spawn(transmit_loop(
            Arc::clone(&endpoint),
            Arc::clone(&mailbox),
            lifecycle.handle(),
        ));
        let receive = tokio::spawn(receive_loop(Arc::clone(&endpoint), lifecycle.handle()));

        Ok(Self {
            lifecycle,
            endpoint,
            mailbox,
            input,
            transmit,
            receive,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Block until Ctrl+C, then tear everything down.
    ///
    /// Returns the exit status the process should report: the interrupt
    /// signal's number.
    pub async fn run_until_interrupt(self) -> std::io::Result<i32> {
        tokio::signal::ctrl_c().await?;
        // Move off the prompt line before teardown messages.
        println!();
        log::info!("[chat] interrupt received, shutting down");
        self.shutdown().await;
        Ok(SIGINT)
    }

    /// Stop the loops and wait for all of them to finish.
    ///
    /// The signal path only flips the lifecycle state; the joins happen
    /// here, in a plain task context.  The endpoint is dropped when
    /// `self` is, after every loop has returned.
    pub async fn shutdown(self) {
        self.lifecycle.begin_shutdown();
        for (name, handle) in [
            ("input", self.input),
            ("transmit", self.transmit),
            ("receive", self.receive),
        ] {
            if let Err(e) = handle.await {
                log::warn!("[chat] {name} loop join failed: {e}");
            }
        }
        self.lifecycle.mark_stopped();
        log::debug!("[chat] all loops stopped");
    }
}
