use async_trait::async_trait;
use bytes::Bytes;

use super::ArtifactStoreError;

/// Text-to-speech in the synthesizer's fixed language and voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns MP3 audio for `text`.
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("speech request failed: {0}")]
    RequestFailed(String),
    #[error("synthesizer returned no audio")]
    EmptyAudio,
    #[error("storing synthesized audio: {0}")]
    Storage(#[from] ArtifactStoreError),
}
