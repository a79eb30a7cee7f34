use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::candle_whisper_engine::CandleWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
}

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    /// Builds the process-wide engine. For `Local` this downloads (or reuses
    /// the cached) weights and blocks until the model is loaded.
    pub fn create(
        provider: TranscriptionProvider,
        model: &str,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match provider {
            TranscriptionProvider::Local => {
                let engine = CandleWhisperEngine::new(model)?;
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::OpenAi => {
                let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "API key required for the Whisper API provider".to_string(),
                    )
                })?;
                let engine = OpenAiWhisperEngine::new(key, base_url, Some(model.to_string()));
                Ok(Arc::new(engine))
            }
        }
    }
}
