use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::LanguageHint;

/// Returns a fixed transcript without looking at the audio.
pub struct MockTranscriptionEngine {
    transcript: String,
}

impl MockTranscriptionEngine {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

impl Default for MockTranscriptionEngine {
    fn default() -> Self {
        Self::new("Hello")
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        _audio_path: &Path,
        _language: Option<&LanguageHint>,
    ) -> Result<String, TranscriptionError> {
        Ok(self.transcript.clone())
    }
}
