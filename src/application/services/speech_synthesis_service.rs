use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream;

use crate::application::ports::{ArtifactStore, SpeechSynthesizer, SynthesisError};
use crate::domain::{GeneratedReply, ResponseAudio, StoragePath};

/// Speaks a reply and writes it next to the other replies in the output store.
pub struct SpeechSynthesisService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    output_store: Arc<dyn ArtifactStore>,
}

impl SpeechSynthesisService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        output_store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            synthesizer,
            output_store,
        }
    }

    pub async fn synthesize(
        &self,
        reply: &GeneratedReply,
        original_filename: &str,
    ) -> Result<ResponseAudio, SynthesisError> {
        let text = reply.for_synthesis();
        if text.len() < reply.as_str().len() {
            tracing::debug!(
                reply_chars = reply.as_str().chars().count(),
                spoken_chars = text.chars().count(),
                "Reply truncated before synthesis"
            );
        }

        let audio = self.synthesizer.synthesize(text).await?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        let storage_path = StoragePath::response_for(original_filename);
        let size_bytes = self
            .output_store
            .save(
                &storage_path,
                Box::pin(stream::iter([Ok::<Bytes, io::Error>(audio)])),
            )
            .await?;

        Ok(ResponseAudio {
            path: self.output_store.locate(&storage_path),
            storage_path,
            size_bytes,
        })
    }
}
