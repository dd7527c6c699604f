//! Chat message payload: validation and wire decode.
//!
//! Every datagram exchanged between peers carries exactly one [`Message`].
//! This module is responsible for:
//! - Enforcing the maximum message length on the send path.
//! - Decoding an inbound datagram payload into printable text, treating
//!   it as NUL/length-terminated (a peer may or may not append a trailing
//!   NUL byte; both forms decode to the same text).
//!
//! No I/O happens here — this is pure data transformation.  There is no
//! header, no framing: one `Message` is one UDP payload, and the datagram
//! boundary is the only delimiter.

use thiserror::Error;

/// Maximum message length in bytes, excluding the line terminator.
pub const MAX_MESSAGE_LEN: usize = 100;

/// A validated outbound or decoded inbound chat message.
///
/// Invariant: the text is at most [`MAX_MESSAGE_LEN`] bytes.  Empty
/// messages are valid; an empty line is transmitted like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

/// Rejection for console input that does not fit in one datagram.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("message is too long ({len} bytes, maximum is {MAX_MESSAGE_LEN})")]
pub struct MessageTooLong {
    /// Byte length of the rejected input.
    pub len: usize,
}

impl Message {
    /// Validate one line of console input (terminator already stripped).
    pub fn new(text: impl Into<String>) -> Result<Self, MessageTooLong> {
        let text = text.into();
        if text.len() > MAX_MESSAGE_LEN {
            return Err(MessageTooLong { len: text.len() });
        }
        Ok(Self(text))
    }

    /// Decode an inbound datagram payload.
    ///
    /// The payload is cut at the first NUL byte if one is present, then
    /// truncated to [`MAX_MESSAGE_LEN`] bytes.  Non-UTF-8 bytes are
    /// replaced rather than rejected — a garbled message is still worth
    /// printing.
    pub fn from_datagram(payload: &[u8]) -> Self {
        let end = payload
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(payload.len())
            .min(MAX_MESSAGE_LEN);
        Self(String::from_utf8_lossy(&payload[..end]).into_owned())
    }

    /// The raw bytes that go on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
