//! Chat history access and the chat view state.
//!
//! This module defines the `ChatHistoryService` port that the infrastructure
//! layer implements, and `ChatView`, which loads a chat and streams its
//! newest assistant reply through a `StreamRenderer`.

pub mod history;
pub mod view;
