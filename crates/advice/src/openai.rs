use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
};
use async_trait::async_trait;
use url::Url;

use crate::api::{ChatApiError, ChatCompletionApi, ChatRequest};

/// OpenAI compatible chat completion API.
#[derive(Debug, Clone)]
pub struct OpenAiChatApi {
    http_client: reqwest::Client,
    api_base: Option<Url>,
}

impl OpenAiChatApi {
    /// Default API base is the OpenAI API.
    pub fn new(http_client: reqwest::Client, api_base: Option<Url>) -> Self {
        Self {
            http_client,
            api_base,
        }
    }

    fn client(&self, api_key: &str) -> Client<OpenAIConfig> {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base.as_str().trim_end_matches('/'));
        }
        Client::with_config(config).with_http_client(self.http_client.clone())
    }
}

#[async_trait]
impl ChatCompletionApi for OpenAiChatApi {
    async fn create_chat_completion(
        &self,
        api_key: &str,
        request: ChatRequest,
    ) -> Result<String, ChatApiError> {
        let message = ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(request.user_text),
            name: None,
        };

        // OpenAI compatible servers do not all support
        // max_completion_tokens yet.
        #[allow(deprecated)]
        let r = self
            .client(api_key)
            .chat()
            .create(CreateChatCompletionRequest {
                messages: vec![
                    ChatCompletionRequestMessage::System(request.system_text.into()),
                    ChatCompletionRequestMessage::User(message),
                ],
                model: request.model,
                temperature: Some(request.temperature),
                max_tokens: Some(request.max_tokens),
                ..Default::default()
            })
            .await;

        match r.map(|r| r.choices.into_iter().next()) {
            Ok(Some(choice)) => match choice.message.content {
                Some(content) if !content.trim().is_empty() => Ok(content),
                _ => Err(ChatApiError::new("response contained no advice text")),
            },
            Ok(None) => Err(ChatApiError::new("response contained no choices")),
            Err(e) => Err(ChatApiError::new(e.to_string())),
        }
    }
}
