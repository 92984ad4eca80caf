//! One assistant turn: a background worker that owns the blocking stream
//! read and marshals every observable effect back to the owning thread
//! over a single-consumer channel.
//!
//! The worker never touches shared state. It sends partial renders while
//! streaming and exactly one terminal event, `Completed` or `Failed`,
//! on every path, so the owner can re-enable input unconditionally when it
//! drains one. Send errors are ignored: a completion arriving after the
//! owner stopped listening is a no-op, not a crash.

use crate::markdown::{StyledRun, render};
use crate::think::ThinkFilter;
use questlog_core::{AssistantError, StreamCallback, StreamChunk};
use questlog_llm::GenerateClient;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// Messages marshaled from the worker to the owning thread, in order.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// A fresh render of the visible text; replaces the previous partial
    /// render for this turn.
    Render(Vec<StyledRun>),
    /// The turn failed with a user-visible message. Terminal.
    Failed(String),
    /// The stream completed; carries the complete unfiltered response
    /// text (with the trailing spacing terminator) for command
    /// extraction. Terminal.
    Completed(String),
}

pub struct TurnRunner {
    client: Arc<dyn GenerateClient + Send + Sync>,
}

impl TurnRunner {
    pub fn new(client: Arc<dyn GenerateClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Start one turn. The show-thinking decision is taken here, once, and
    /// holds for the whole turn. Returns the receiving end of the turn's
    /// event channel; the worker thread is detached and ends with the
    /// stream.
    pub fn start_turn(&self, prompt: String, show_thinking: bool) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel();
        let client = Arc::clone(&self.client);

        thread::spawn(move || {
            // Accumulator state lives behind a mutex only because the
            // stream callback is a shared `Fn`; the worker is the sole
            // caller.
            let state = Mutex::new((String::new(), ThinkFilter::new(show_thinking)));
            let render_tx = tx.clone();
            let cb: StreamCallback = Arc::new(move |chunk| {
                if let StreamChunk::ContentDelta(fragment) = chunk {
                    let Ok(mut guard) = state.lock() else {
                        return;
                    };
                    let (full_text, filter) = &mut *guard;
                    full_text.push_str(&fragment);
                    let visible = filter.filter(full_text);
                    let _ = render_tx.send(TurnEvent::Render(render(visible)));
                }
            });

            match client.generate_streaming(&prompt, cb) {
                Ok(mut full_text) => {
                    full_text.push_str("\n\n");
                    let _ = tx.send(TurnEvent::Completed(full_text));
                }
                Err(err) => {
                    // Connection refusal gets its own message; everything
                    // else carries the error's description.
                    let msg = match err.downcast_ref::<AssistantError>() {
                        Some(AssistantError::NetworkUnavailable) => err.to_string(),
                        _ => format!("Error - {err:#}"),
                    };
                    let _ = tx.send(TurnEvent::Failed(msg));
                }
            }
        });

        rx
    }
}
