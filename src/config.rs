//! Startup configuration: validated ports.
//!
//! Validation runs before any socket is created; a bad port never gets as
//! far as `bind`.

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

/// Lowest acceptable port.  Ports below this are reserved for system
/// services.  The upper bound (65535) is enforced by `u16` itself.
pub const PORT_MIN: u16 = 1024;

/// Validated startup parameters for one chat endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatConfig {
    /// Port this endpoint binds on loopback.
    pub local_port: u16,
    /// Counterpart's port, when given on the command line.  `None` means
    /// the peer is learned from the first inbound datagram.
    pub peer_port: Option<u16>,
}

/// Rejection for out-of-range port arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("enter a port between {PORT_MIN} and 65535 (got {0})")]
    PortOutOfRange(u16),
}

impl ChatConfig {
    /// Validate both ports and build the configuration.
    pub fn new(local_port: u16, peer_port: Option<u16>) -> Result<Self, ConfigError> {
        check_port(local_port)?;
        if let Some(port) = peer_port {
            check_port(port)?;
        }
        Ok(Self {
            local_port,
            peer_port,
        })
    }

    /// Explicit peer address on loopback, if a peer port was given.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_port
            .map(|port| SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }
}

/// Confirm `port` is in the unprivileged range.
pub fn check_port(port: u16) -> Result<(), ConfigError> {
    if port < PORT_MIN {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_boundaries() {
        assert_eq!(check_port(1024), Ok(()));
        assert_eq!(check_port(65535), Ok(()));
    }

    #[test]
    fn rejects_below_minimum() {
        assert_eq!(check_port(1023), Err(ConfigError::PortOutOfRange(1023)));
        assert_eq!(check_port(0), Err(ConfigError::PortOutOfRange(0)));
    }

    #[test]
    fn config_validates_both_ports() {
        assert!(ChatConfig::new(9001, Some(9002)).is_ok());
        assert_eq!(
            ChatConfig::new(80, None),
            Err(ConfigError::PortOutOfRange(80))
        );
        assert_eq!(
            ChatConfig::new(9001, Some(443)),
            Err(ConfigError::PortOutOfRange(443))
        );
    }

    #[test]
    fn peer_addr_is_loopback() {
        let config = ChatConfig::new(9001, Some(9002)).unwrap();
        assert_eq!(config.peer_addr(), Some("127.0.0.1:9002".parse().unwrap()));
        let config = ChatConfig::new(9001, None).unwrap();
        assert_eq!(config.peer_addr(), None);
    }
}
