use std::path::Path;

use async_trait::async_trait;

use crate::domain::LanguageHint;

/// Speech recognition: audio file in, recognized text out.
///
/// Implementations are shared by every in-flight request, hence `Sync`.
/// With `language: None` the engine detects the spoken language itself.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&LanguageHint>,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
