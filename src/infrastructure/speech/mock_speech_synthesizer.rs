use async_trait::async_trait;
use bytes::Bytes;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};

/// Produces a fake MP3 payload: an ID3 tag header followed by the text.
#[derive(Default)]
pub struct MockSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError> {
        let mut audio = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
        audio.extend_from_slice(text.as_bytes());
        Ok(Bytes::from(audio))
    }
}
