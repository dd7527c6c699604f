//! Single-slot outbound mailbox.
//!
//! The mailbox decouples message composition (the console reader) from
//! transmission (the sender loop).  It holds **at most one** pending
//! [`Message`]:
//! - [`Mailbox::deposit`] replaces any pending message.  A line typed
//!   before the previous one went out wins over it — latest-wins is the
//!   contract, there is no queue.
//! - [`Mailbox::take`] parks the caller until a message is available,
//!   then clears the slot.  Each message is consumed exactly once.
//!
//! Wakeups ride on a [`tokio::sync::Notify`]: `notify_one` stores a permit
//! when no taker is parked, so a deposit that races the taker's readiness
//! check is never lost.  The slot itself is a plain `std::sync::Mutex` —
//! it is held only for the swap, never across an await.

use std::sync::Mutex;

use tokio::sync::Notify;

use crate::message::Message;

/// Mutex-guarded single message slot with async readiness signaling.
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Mutex<Option<Message>>,
    available: Notify,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message`, replacing any pending one, and wake the taker.
    pub fn deposit(&self, message: Message) {
        let mut slot = self.slot.lock().expect("mailbox lock poisoned");
        *slot = Some(message);
        drop(slot);
        self.available.notify_one();
    }

    /// Clear and return the pending message, if any.  Never blocks.
    pub fn take_if_ready(&self) -> Option<Message> {
        self.slot.lock().expect("mailbox lock poisoned").take()
    }

    /// Wait until a message is available, then clear and return it.
    ///
    /// Cancel-safe: dropping the future mid-wait leaves any pending
    /// message in the slot and any stored permit intact, so this can be
    /// raced against a shutdown signal in `tokio::select!`.
    pub async fn take(&self) -> Message {
        loop {
            if let Some(message) = self.take_if_ready() {
                return message;
            }
            self.available.notified().await;
        }
    }
}
