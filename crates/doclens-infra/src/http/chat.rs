//! HttpChatHistoryService -- `GET /api/chats/{id}` -> `{ title, messages }`.

use reqwest::StatusCode;

use doclens_core::chat::history::ChatHistoryService;
use doclens_types::chat::ChatHistory;
use doclens_types::error::ChatError;

use super::ApiClient;

/// Chat history backed by the DocLens REST API.
#[derive(Debug, Clone)]
pub struct HttpChatHistoryService {
    api: ApiClient,
}

impl HttpChatHistoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl ChatHistoryService for HttpChatHistoryService {
    async fn get_chat(&self, chat_id: &str) -> Result<ChatHistory, ChatError> {
        let url = self.api.endpoint(&["api", "chats", chat_id]);
        tracing::debug!(%url, "fetching chat history");

        let response = self
            .api
            .http()
            .get(url)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(ChatError::NotFound),
            status => return Err(ChatError::Rejected(status.as_u16())),
        }

        response
            .json::<ChatHistory>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}
