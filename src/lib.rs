//! `udp-chat` — a two-way UDP chat endpoint over loopback.
//!
//! Two terminals, two ports:
//!
//! ```text
//! $ udp-chat 9001          # waits; learns its peer from the first message
//! $ udp-chat 9002 9001     # knows its peer up front
//! ```
//!
//! Anything typed into one terminal is sent to the other (100 characters
//! max) and printed there as `[<port>]: <text>`.  Ctrl+C exits.
//!
//! # Architecture
//!
//! ```text
//!  ┌────────────┐  deposit   ┌─────────┐   take    ┌───────────────┐
//!  │ input_loop │───────────▶│ Mailbox │──────────▶│ transmit_loop │
//!  └────────────┘  (latest   └─────────┘  (awaits  └───────┬───────┘
//!        ▲          wins)                  deposit)        │ send
//!        │ console                                         ▼
//!  ┌─────┴────────┐   recv / learn peer              ┌──────────┐
//!  │ receive_loop │◀─────────────────────────────────│ Endpoint │
//!  └──────────────┘                                  └──────────┘
//! ```
//!
//! Each module has a single responsibility:
//! - [`config`]    — validated startup parameters
//! - [`endpoint`]  — async UDP socket plus the write-once peer address
//! - [`message`]   — payload validation and wire decode
//! - [`mailbox`]   — single-slot buffer between composition and transmission
//! - [`input`]     — console line collection
//! - [`lifecycle`] — coordinated start/stop of the concurrent activities
//! - [`session`]   — the three task loops and their orchestration

pub mod config;
pub mod endpoint;
pub mod input;
pub mod lifecycle;
pub mod mailbox;
pub mod message;
pub mod session;
