#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Financial advice from an external chat completion service.

pub mod api;
pub mod openai;
pub mod prompt;

use std::{sync::Arc, time::Duration};

use api::{ChatCompletionApi, ChatRequest};
use config::{Config, secrets::ApiKeySource};
use error_stack::{Report, Result};
use model::Profile;
use openai::OpenAiChatApi;
use tokio::time::Instant;
use tracing::info;
use utils::ContextExt;

pub use prompt::build_advice_prompt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdviceError {
    #[error(
        "OpenAI API key not configured. Add OPENAI_API_KEY to the secrets file or set the OPENAI_API_KEY environment variable."
    )]
    CredentialNotConfigured,
    #[error("Error generating advice: {0}")]
    Generation(String),
}

impl AdviceError {
    /// Text which can be shown to the user.
    pub fn user_message(report: &Report<AdviceError>) -> String {
        report.current_context().to_string()
    }
}

/// Source of the API key. Called once per advice request.
pub trait CredentialProvider: Send + Sync + 'static {
    fn api_key(&self) -> Option<String>;
}

impl CredentialProvider for ApiKeySource {
    fn api_key(&self) -> Option<String> {
        self.read_api_key()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceSettings {
    pub model: String,
    pub system_text: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl AdviceSettings {
    pub fn from_config(config: &Config) -> Self {
        let advice = config.advice();
        Self {
            model: advice.model.clone(),
            system_text: advice.system_text.clone(),
            temperature: advice.temperature,
            max_tokens: advice.max_tokens,
            timeout: config.advice_timeout(),
        }
    }
}

/// Requests advice text for a profile.
///
/// Every call is a new request. Nothing is cached and failed requests
/// are not retried.
#[derive(Clone)]
pub struct AdviceClient {
    api: Arc<dyn ChatCompletionApi>,
    credentials: Arc<dyn CredentialProvider>,
    settings: AdviceSettings,
}

impl AdviceClient {
    pub fn new(
        api: Arc<dyn ChatCompletionApi>,
        credentials: Arc<dyn CredentialProvider>,
        settings: AdviceSettings,
    ) -> Self {
        Self {
            api,
            credentials,
            settings,
        }
    }

    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        let api = OpenAiChatApi::new(http_client, config.advice().openai_api_url.clone());
        Self::new(
            Arc::new(api),
            Arc::new(config.api_key_source()),
            AdviceSettings::from_config(config),
        )
    }

    pub fn settings(&self) -> &AdviceSettings {
        &self.settings
    }

    /// The request is not sent if the API key is missing. A request
    /// which takes longer than the configured timeout fails.
    pub async fn request_advice(&self, profile: &Profile) -> Result<String, AdviceError> {
        let Some(api_key) = self.credentials.api_key() else {
            return Err(AdviceError::CredentialNotConfigured.report());
        };

        let request = ChatRequest {
            model: self.settings.model.clone(),
            system_text: self.settings.system_text.clone(),
            user_text: build_advice_prompt(profile),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let start = Instant::now();
        let result = tokio::time::timeout(
            self.settings.timeout,
            self.api.create_chat_completion(&api_key, request),
        )
        .await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(advice)) => {
                info!("Advice request completed in {:?}", elapsed);
                Ok(advice)
            }
            Ok(Err(e)) => {
                info!("Advice request failed after {:?}", elapsed);
                Err(AdviceError::Generation(e.to_string()).report())
            }
            Err(_) => {
                info!("Advice request timed out after {:?}", elapsed);
                Err(AdviceError::Generation(format!(
                    "no response within {:?}",
                    self.settings.timeout
                ))
                .report())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use model::Age;

    use super::*;
    use crate::api::ChatApiError;

    enum Reply {
        Text(&'static str),
        Failure(&'static str),
        Hang,
    }

    struct FakeApi {
        reply: Reply,
        calls: AtomicUsize,
        last: Mutex<Option<(String, ChatRequest)>>,
    }

    impl FakeApi {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompletionApi for FakeApi {
        async fn create_chat_completion(
            &self,
            api_key: &str,
            request: ChatRequest,
        ) -> std::result::Result<String, ChatApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((api_key.to_string(), request));
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Failure(message) => Err(ChatApiError::new(message)),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    struct FixedKey(Option<&'static str>);

    impl CredentialProvider for FixedKey {
        fn api_key(&self) -> Option<String> {
            self.0.map(ToString::to_string)
        }
    }

    fn settings() -> AdviceSettings {
        AdviceSettings {
            model: "gpt-4o-mini".to_string(),
            system_text: "You are a helpful financial advisor.".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(5),
        }
    }

    fn client(api: Arc<FakeApi>, key: Option<&'static str>) -> AdviceClient {
        AdviceClient::new(api, Arc::new(FixedKey(key)), settings())
    }

    fn profile() -> Profile {
        Profile {
            age: Age::new(30),
            target_retirement_age: Age::new(65),
            income: "100000".to_string(),
            cash_savings: "10000".to_string(),
            investments: "50000".to_string(),
            retirement_accounts: "20000".to_string(),
            kids_ages: "8, 15".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_credential_makes_no_request() {
        let api = FakeApi::new(Reply::Text("Save more."));
        let report = client(api.clone(), None)
            .request_advice(&profile())
            .await
            .unwrap_err();

        assert_eq!(report.current_context(), &AdviceError::CredentialNotConfigured);
        assert!(AdviceError::user_message(&report).contains("not configured"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn successful_response_is_returned() {
        let api = FakeApi::new(Reply::Text("Save more."));
        let advice = client(api.clone(), Some("sk-test"))
            .request_advice(&profile())
            .await
            .unwrap();

        assert_eq!(advice, "Save more.");
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn api_failure_message_is_kept() {
        let api = FakeApi::new(Reply::Failure("connection refused"));
        let report = client(api.clone(), Some("sk-test"))
            .request_advice(&profile())
            .await
            .unwrap_err();

        let message = AdviceError::user_message(&report);
        assert!(message.starts_with("Error generating advice: "));
        assert!(message.contains("connection refused"));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let api = FakeApi::new(Reply::Hang);
        let mut settings = settings();
        settings.timeout = Duration::from_millis(20);
        let client = AdviceClient::new(api.clone(), Arc::new(FixedKey(Some("sk-test"))), settings);

        let report = client.request_advice(&profile()).await.unwrap_err();

        let message = AdviceError::user_message(&report);
        assert!(message.starts_with("Error generating advice: "));
        assert!(message.contains("no response within"));
    }

    #[tokio::test]
    async fn request_has_configured_settings_and_prompt() {
        let api = FakeApi::new(Reply::Text("Save more."));
        client(api.clone(), Some("sk-test"))
            .request_advice(&profile())
            .await
            .unwrap();

        let (api_key, request) = api.last.lock().unwrap().clone().unwrap();
        assert_eq!(api_key, "sk-test");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.system_text, "You are a helpful financial advisor.");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.user_text, build_advice_prompt(&profile()));
        assert!(request.user_text.contains("- Kids' ages: 8, 15"));
    }

    #[tokio::test]
    async fn identical_requests_are_not_cached() {
        let api = FakeApi::new(Reply::Text("Save more."));
        let client = client(api.clone(), Some("sk-test"));

        client.request_advice(&profile()).await.unwrap();
        client.request_advice(&profile()).await.unwrap();

        assert_eq!(api.calls(), 2);
    }
}
