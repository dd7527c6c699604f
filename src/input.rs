//! Console input collection.
//!
//! [`input_loop`] reads one line at a time, validates its length, and
//! deposits it into the shared [`Mailbox`].  The loop is generic over the
//! reader so tests can feed scripted input; production wires it to
//! `tokio::io::stdin`.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::lifecycle::LifecycleHandle;
use crate::mailbox::Mailbox;
use crate::message::{Message, MAX_MESSAGE_LEN};

/// Print the marker indicating the chat is ready for input.
///
/// Also re-issued by the receive loop after printing an inbound message,
/// so the operator always sees a fresh prompt.
pub fn prompt() {
    print!(">>> ");
    let _ = std::io::stdout().flush();
}

/// Read lines until shutdown or end of input.
///
/// Per line:
/// - over [`MAX_MESSAGE_LEN`] bytes of content: print a notice and
///   discard the whole line, never a truncated piece of it;
/// - otherwise: strip the terminator and deposit into the mailbox,
///   replacing any message still waiting there.
///
/// Read errors are reported and skipped.  End of input ends only this
/// activity; reception and transmission keep running until interrupt.
pub async fn input_loop<R>(mut reader: R, mailbox: Arc<Mailbox>, mut lifecycle: LifecycleHandle)
where
    R: AsyncBufRead + Unpin,
{
    while lifecycle.is_running() {
        prompt();

        let mut line = String::new();
        let read = tokio::select! {
            read = reader.read_line(&mut line) => read,
            _ = lifecycle.stopped() => return,
        };

        match read {
            Ok(0) => {
                log::debug!("[stdin] input closed");
                return;
            }
            Ok(_) => {
                let text = line.strip_suffix('\n').unwrap_or(&line);
                let text = text.strip_suffix('\r').unwrap_or(text);
                match Message::new(text) {
                    Ok(message) => mailbox.deposit(message),
                    Err(_) => {
                        println!(
                            "Message is too long. Maximum message length is {MAX_MESSAGE_LEN} chars."
                        );
                    }
                }
            }
            Err(e) => {
                log::warn!("[stdin] read failed: {e}");
            }
        }
    }
}
