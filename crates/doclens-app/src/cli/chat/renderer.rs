//! Terminal output for chat messages.
//!
//! Settled messages are printed whole. The message under playback is printed
//! frame by frame from the view's reveal channel: each frame only adds the
//! characters revealed since the previous one.

use std::future::Future;
use std::io::{self, Write};

use console::style;

use doclens_core::chat::history::ChatHistoryService;
use doclens_core::chat::view::ChatView;
use doclens_types::chat::{Message, Sender};

/// Speaker label printed before a message.
fn label(sender: Sender) -> String {
    match sender {
        Sender::User => format!("{}", style("you").green().bold()),
        Sender::Assistant => format!("{}", style("doclens").cyan().bold()),
    }
}

/// Print a whole message.
pub fn write_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    writeln!(out, "  {} {}", label(message.sender), message.text)?;
    writeln!(out)
}

/// Print the message under playback as it is revealed.
///
/// Returns once the reveal completes or stops. When `skip` resolves first,
/// the rest of the text is revealed at once.
pub async fn stream_reply<C, W, S>(view: &mut ChatView<C>, out: &mut W, skip: S) -> io::Result<()>
where
    C: ChatHistoryService,
    W: Write,
    S: Future<Output = ()>,
{
    let Some(index) = view.streaming_index() else {
        return Ok(());
    };
    let sender = view.messages()[index].sender;

    let mut rx = view.subscribe_reveal();
    write!(out, "  {} ", label(sender))?;

    let mut printed = 0;
    tokio::pin!(skip);
    let mut skipped = false;

    loop {
        // Checked before reading the frame, so a task that just finished has
        // already published its last frame.
        let active = view.renderer().is_active();
        let frame = rx.borrow_and_update().clone();
        if let Some(delta) = frame.text.get(printed..) {
            out.write_all(delta.as_bytes())?;
            out.flush()?;
            printed = frame.text.len();
        }
        if frame.complete || !active {
            break;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut skip, if !skipped => {
                skipped = true;
                tracing::debug!("reveal skipped");
                view.renderer_mut().skip();
            }
        }
    }

    writeln!(out)?;
    writeln!(out)
}
