use crate::application::ports::{LlmClient, LlmClientError};

/// Answers every prompt with a fixed reply.
pub struct MockLlmClient {
    reply: String,
}

impl MockLlmClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new("Mock answer")
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str, _max_tokens: usize) -> Result<String, LlmClientError> {
        Ok(self.reply.clone())
    }
}
