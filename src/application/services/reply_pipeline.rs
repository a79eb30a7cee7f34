use std::sync::Arc;

use crate::application::ports::{ArtifactStore, LlmClient, TranscriptionEngine};
use crate::domain::{GeneratedReply, PipelineStage, ResponseAudio, StoragePath, UploadedAudio};
use crate::infrastructure::observability::sanitize_prompt;

use super::pipeline_error::PipelineError;
use super::speech_synthesis_service::SpeechSynthesisService;

/// Token budget requested from the language model per reply.
pub const DEFAULT_MAX_TOKENS: usize = 300;

/// Runs one upload through store, transcribe, reply and synthesize, in that
/// order, stopping at the first failing stage.
///
/// The pipeline holds no per-request state. The only thing shared between
/// concurrent calls is the injected engines, which are read-only from here.
/// Artifacts written before a failure are left in place.
pub struct ReplyPipeline {
    upload_store: Arc<dyn ArtifactStore>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    llm_client: Arc<dyn LlmClient>,
    speech_synthesis: SpeechSynthesisService,
    max_tokens: usize,
}

impl ReplyPipeline {
    pub fn new(
        upload_store: Arc<dyn ArtifactStore>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        llm_client: Arc<dyn LlmClient>,
        speech_synthesis: SpeechSynthesisService,
    ) -> Self {
        Self {
            upload_store,
            transcription_engine,
            llm_client,
            speech_synthesis,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[tracing::instrument(
        skip(self, upload),
        fields(filename = %upload.original_filename, language = ?upload.language)
    )]
    pub async fn process(&self, upload: UploadedAudio) -> Result<ResponseAudio, PipelineError> {
        let mut stage = PipelineStage::Received;

        match self.run(upload, &mut stage).await {
            Ok(audio) => {
                tracing::info!(
                    stage = %PipelineStage::Done,
                    output = %audio.storage_path,
                    bytes = audio.size_bytes,
                    "Reply audio ready"
                );
                Ok(audio)
            }
            Err(e) => {
                tracing::error!(
                    stage = %PipelineStage::Failed,
                    last_completed = %stage,
                    kind = %e.kind(),
                    error = %e,
                    "Pipeline failed"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        upload: UploadedAudio,
        stage: &mut PipelineStage,
    ) -> Result<ResponseAudio, PipelineError> {
        let original_filename = upload.original_filename.clone();
        let language = upload.language.clone();

        let upload_path = StoragePath::upload(&original_filename);
        let stored_bytes = self
            .upload_store
            .save(&upload_path, upload.into_stream())
            .await?;
        advance(stage);
        tracing::debug!(stage = %stage, path = %upload_path, bytes = stored_bytes, "Upload stored");

        let audio_path = self.upload_store.locate(&upload_path);
        let transcript = self
            .transcription_engine
            .transcribe(&audio_path, language.as_ref())
            .await?;
        advance(stage);
        tracing::debug!(
            stage = %stage,
            transcript = %sanitize_prompt(&transcript),
            "Audio transcribed"
        );

        let reply = self
            .llm_client
            .complete(&transcript, self.max_tokens)
            .await
            .map(GeneratedReply::new)?;
        advance(stage);
        tracing::debug!(
            stage = %stage,
            reply = %sanitize_prompt(reply.as_str()),
            "Reply generated"
        );

        let audio = self
            .speech_synthesis
            .synthesize(&reply, &original_filename)
            .await?;
        advance(stage);
        tracing::debug!(stage = %stage, path = %audio.storage_path, "Reply synthesized");

        Ok(audio)
    }
}

fn advance(stage: &mut PipelineStage) {
    if let Some(next) = stage.next() {
        *stage = next;
    }
}
