use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("No language model API key configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Empty completion")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<PromptMessage>,
}

/// A hosted language model that turns a prompt into reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Used when no API key is configured. Every call fails, so the responder
/// always answers from its canned replies.
pub struct OfflineClient;

#[async_trait]
impl CompletionClient for OfflineClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [PromptMessage],
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(api_key: &str, config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &request.system,
            messages: &request.messages,
        };

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let data: MessagesResponse = resp.json().await?;
        let text: String = data.content.into_iter().map(|block| block.text).collect();
        if text.trim().is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(text)
    }
}

/// Picks the hosted client when an API key is configured.
pub fn client_from_config(config: &LlmConfig) -> Arc<dyn CompletionClient> {
    match config.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
        Some(key) => {
            tracing::info!(model = %config.model, "Using hosted language model for chat");
            Arc::new(AnthropicClient::new(key, config))
        }
        None => {
            tracing::info!("No language model API key, chat uses canned replies");
            Arc::new(OfflineClient)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_client_always_fails() {
        let request = CompletionRequest {
            system: "sys".into(),
            messages: vec![],
        };
        let err = OfflineClient.complete(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }

    #[test]
    fn messages_request_shape() {
        let messages = vec![PromptMessage {
            role: "user".into(),
            content: "hi".into(),
        }];
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            system: "s",
            messages: &messages,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["system"], "s");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_text_blocks_concatenate() {
        let data: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello "},{"type":"text","text":"there"}]}"#,
        )
        .unwrap();
        let text: String = data.content.into_iter().map(|b| b.text).collect();
        assert_eq!(text, "Hello there");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = LlmConfig {
            api_key: None,
            base_url: "https://example.test/".into(),
            model: "m".into(),
            max_tokens: 100,
        };
        let client = AnthropicClient::new("key", &config);
        assert_eq!(client.base_url, "https://example.test");
    }
}
