//! ChatHistoryService trait definition.

use doclens_types::chat::ChatHistory;
use doclens_types::error::ChatError;

/// Port for the external chat history service (`GET /api/chats/{chatId}`).
///
/// Implementations live in doclens-infra (e.g., `HttpChatHistoryService`).
pub trait ChatHistoryService: Send + Sync {
    /// Fetch the title and messages of a chat.
    fn get_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<ChatHistory, ChatError>> + Send;
}

impl<C: ChatHistoryService + ?Sized> ChatHistoryService for std::sync::Arc<C> {
    fn get_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<ChatHistory, ChatError>> + Send {
        (**self).get_chat(chat_id)
    }
}
