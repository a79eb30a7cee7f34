mod chat_client;
mod mock_llm_client;

pub use chat_client::{ChatCompletionClient, create_chat_client};
pub use mock_llm_client::MockLlmClient;
