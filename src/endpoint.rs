//! Async UDP endpoint: the bound socket plus the (possibly unknown) peer.
//!
//! [`Endpoint`] is a thin wrapper around `tokio::net::UdpSocket` that also
//! owns the peer address cell.  The peer starts unset and is written at
//! most once, by whoever gets there first:
//! - the startup path, when a peer port was given on the command line, or
//! - the receive loop, from the first inbound datagram's source.
//!
//! The cell rides in a `tokio::sync::watch` channel so the write is an
//! atomic check-and-set (closing the startup race between the two writers)
//! and the sender loop can await the peer becoming known instead of
//! polling for it.
//!
//! All methods are `&self`; the endpoint is shared across tasks behind an
//! `Arc`.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::watch;

use crate::message::Message;

/// Errors that can arise from endpoint operations.
///
/// `Bind` is fatal at startup; `Send` and `Recv` are reported by the
/// owning loop and retried.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("failed to bind 127.0.0.1:{port}: {source}")]
    Bind { port: u16, source: io::Error },
    #[error("send failed: {0}")]
    Send(io::Error),
    #[error("receive failed: {0}")]
    Recv(io::Error),
}

/// A loopback-scoped UDP socket with a write-once peer address.
#[derive(Debug)]
pub struct Endpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    peer: watch::Sender<Option<SocketAddr>>,
}

impl Endpoint {
    /// Bind to `127.0.0.1:local_port`.
    ///
    /// Port 0 asks the OS for an ephemeral port; `local_addr` reports the
    /// resolved address either way.
    pub async fn bind(local_port: u16) -> Result<Self, EndpointError> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, local_port))
            .await
            .map_err(|source| EndpointError::Bind {
                port: local_port,
                source,
            })?;
        let local_addr = socket.local_addr().map_err(|source| EndpointError::Bind {
            port: local_port,
            source,
        })?;
        let (peer, _) = watch::channel(None);
        Ok(Self {
            socket,
            local_addr,
            peer,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Record the peer address if none is set yet.
    ///
    /// Returns `true` when this call was the writer.  Later calls are
    /// no-ops regardless of the address they carry: first writer wins,
    /// and an explicit command-line peer set at startup is never
    /// overwritten by a learned source.
    pub fn set_peer(&self, addr: SocketAddr) -> bool {
        self.peer.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(addr);
                true
            } else {
                false
            }
        })
    }

    /// The peer address, if known.
    pub fn peer(&self) -> Option<SocketAddr> {
        *self.peer.borrow()
    }

    /// Resolve once the peer address is known.
    ///
    /// Returns immediately when it already is.  The peer is set at most
    /// once and never cleared, so the returned address stays valid for the
    /// rest of the run.
    pub async fn wait_for_peer(&self) -> SocketAddr {
        let mut rx = self.peer.subscribe();
        // The sender lives in `self`, so the channel cannot close while
        // this borrow is alive.
        let known = *rx
            .wait_for(|slot| slot.is_some())
            .await
            .expect("peer watch closed");
        known.expect("guarded by wait_for")
    }

    /// Transmit `message` as a single datagram to `dest`.
    pub async fn send(&self, message: &Message, dest: SocketAddr) -> Result<(), EndpointError> {
        self.socket
            .send_to(message.as_bytes(), dest)
            .await
            .map_err(EndpointError::Send)?;
        Ok(())
    }

    /// Receive the next datagram into `buf`.
    ///
    /// Returns `(length, source_address)`.  A payload longer than `buf`
    /// is truncated by the OS, which matches the fixed maximum message
    /// length on the wire.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), EndpointError> {
        self.socket.recv_from(buf).await.map_err(EndpointError::Recv)
    }
}
