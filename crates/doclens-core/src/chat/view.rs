//! Chat view state.
//!
//! Holds one chat at a time. Loading failures are logged and leave the view
//! in `Loading` (no retry, nothing surfaced to the user). The newest message,
//! when it comes from the assistant, is played back through the view's
//! [`StreamRenderer`]; switching chats or dropping the view cancels it.

use std::time::Duration;

use doclens_types::chat::{Message, Sender};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::stream::renderer::{RevealFrame, StreamRenderer};

use super::history::ChatHistoryService;

/// What the chat view currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatViewState {
    /// Waiting for the chat history (also the state after a failed fetch).
    #[default]
    Loading,
    /// Chat loaded.
    Ready {
        title: String,
        messages: Vec<Message>,
    },
}

/// A chat view bound to a chat history service.
pub struct ChatView<C: ChatHistoryService> {
    service: C,
    chat_id: Option<String>,
    state: ChatViewState,
    renderer: StreamRenderer,
    /// Index of the message currently played back by the renderer.
    streaming: Option<usize>,
}

impl<C: ChatHistoryService> ChatView<C> {
    pub fn new(service: C, reveal_tick: Duration) -> Self {
        Self {
            service,
            chat_id: None,
            state: ChatViewState::Loading,
            renderer: StreamRenderer::new(reveal_tick),
            streaming: None,
        }
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ChatViewState::Loading)
    }

    pub fn title(&self) -> Option<&str> {
        match &self.state {
            ChatViewState::Ready { title, .. } => Some(title),
            ChatViewState::Loading => None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        match &self.state {
            ChatViewState::Ready { messages, .. } => messages,
            ChatViewState::Loading => &[],
        }
    }

    /// Index of the message being revealed, if any.
    pub fn streaming_index(&self) -> Option<usize> {
        self.streaming
    }

    /// Reveal frames of the message being played back.
    pub fn subscribe_reveal(&self) -> watch::Receiver<RevealFrame> {
        self.renderer.subscribe()
    }

    pub fn renderer(&self) -> &StreamRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut StreamRenderer {
        &mut self.renderer
    }

    /// Load a chat, replacing whatever was shown.
    ///
    /// Returns whether the chat loaded. On failure the error is logged and
    /// the view stays in `Loading`.
    ///
    /// Must be called from within a tokio runtime: a loaded chat whose
    /// newest message is an assistant reply starts a reveal task.
    pub async fn load(&mut self, chat_id: &str) -> bool {
        self.renderer.cancel();
        self.streaming = None;
        self.state = ChatViewState::Loading;
        self.chat_id = Some(chat_id.to_string());

        match self.service.get_chat(chat_id).await {
            Ok(history) => {
                info!(chat_id, messages = history.messages.len(), "chat loaded");
                self.state = ChatViewState::Ready {
                    title: history.title,
                    messages: history.messages,
                };
                self.stream_newest();
                true
            }
            Err(e) => {
                warn!(chat_id, error = %e, "failed to load chat");
                false
            }
        }
    }

    /// Append a message locally (optimistic send or a reply that just
    /// arrived). Ignored while the chat is still loading.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime when the appended message is an
    /// assistant reply, since its reveal runs on a spawned task.
    pub fn append_local(&mut self, message: Message) -> bool {
        let ChatViewState::Ready { messages, .. } = &mut self.state else {
            debug!("chat not loaded, dropping local message");
            return false;
        };
        messages.push(message);
        self.stream_newest();
        true
    }

    /// Drop the current chat and stop any playback.
    pub fn close(&mut self) {
        self.renderer.cancel();
        self.streaming = None;
        self.state = ChatViewState::Loading;
        self.chat_id = None;
    }

    /// Start the renderer on the newest message if the assistant wrote it.
    fn stream_newest(&mut self) {
        let messages = self.messages();
        let Some(last) = messages.last() else {
            return;
        };
        if last.sender != Sender::Assistant {
            return;
        }
        let index = messages.len() - 1;
        let text = last.text.clone();
        self.renderer.start(text);
        self.streaming = Some(index);
    }
}
