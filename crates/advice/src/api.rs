use async_trait::async_trait;

/// Single turn chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system_text: String,
    pub user_text: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ChatApiError {
    message: String,
}

impl ChatApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Chat completion service. Implementations make exactly one request
/// per call and do not retry.
#[async_trait]
pub trait ChatCompletionApi: Send + Sync + 'static {
    /// Returns text of the first choice.
    async fn create_chat_completion(
        &self,
        api_key: &str,
        request: ChatRequest,
    ) -> Result<String, ChatApiError>;
}
