use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::presentation::config::LlmSettings;

/// Single-turn client for OpenAI-compatible `/chat/completions` backends.
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmClientError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        tracing::debug!(model = %self.model, max_tokens, "Requesting chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(format!("body: {}", e)))?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))?
            .message
            .content
            .ok_or_else(|| LlmClientError::InvalidResponse("missing message content".to_string()))?;

        tracing::info!(chars = content.len(), "Chat completion received");

        Ok(content)
    }
}

pub fn create_chat_client(settings: &LlmSettings) -> Result<ChatCompletionClient, LlmClientError> {
    let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
    ChatCompletionClient::new(
        &settings.base_url,
        settings.api_key.clone(),
        settings.chat_model.clone(),
        timeout,
    )
}
