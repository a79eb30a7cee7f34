use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, LlmClient, LlmClientError, SpeechSynthesizer,
    TranscriptionEngine, TranscriptionError,
};
use crate::application::services::{ReplyPipeline, SpeechSynthesisService};
use crate::infrastructure::audio::{MockTranscriptionEngine, TranscriptionEngineFactory};
use crate::infrastructure::llm::{MockLlmClient, create_chat_client};
use crate::infrastructure::speech::{GoogleTranslateTts, MockSpeechSynthesizer};
use crate::infrastructure::storage::LocalArtifactStore;
use crate::presentation::config::{ScaffoldConfig, Settings};

use super::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("artifact store: {0}")]
    Storage(#[from] ArtifactStoreError),
    #[error("transcription engine: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("llm client: {0}")]
    Llm(#[from] LlmClientError),
}

/// Wires the pipeline from settings. The transcription model is loaded here,
/// once, and shared by every request.
pub fn build_app_state(
    settings: Settings,
    scaffold_config: ScaffoldConfig,
) -> Result<AppState, StateBuildError> {
    let upload_store: Arc<dyn ArtifactStore> = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.upload_dir,
    ))?);
    let output_store: Arc<dyn ArtifactStore> = Arc::new(LocalArtifactStore::new(PathBuf::from(
        &settings.storage.output_dir,
    ))?);

    let engines = build_engines(&settings, &scaffold_config)?;

    let pipeline = ReplyPipeline::new(
        upload_store,
        engines.transcription,
        engines.llm,
        SpeechSynthesisService::new(engines.synthesizer, output_store),
    )
    .with_max_tokens(settings.llm.max_tokens);

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        settings,
    })
}

struct Engines {
    transcription: Arc<dyn TranscriptionEngine>,
    llm: Arc<dyn LlmClient>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

fn build_engines(
    settings: &Settings,
    scaffold_config: &ScaffoldConfig,
) -> Result<Engines, StateBuildError> {
    if scaffold_config.enabled {
        tracing::warn!("Scaffold mode enabled: using mock transcription, llm and speech engines");
        return Ok(Engines {
            transcription: Arc::new(MockTranscriptionEngine::new(
                scaffold_config.transcript.clone(),
            )),
            llm: Arc::new(MockLlmClient::new(scaffold_config.reply.clone())),
            synthesizer: Arc::new(MockSpeechSynthesizer),
        });
    }

    let transcription = &settings.transcription;
    Ok(Engines {
        transcription: TranscriptionEngineFactory::create(
            transcription.provider,
            &transcription.model,
            transcription.api_key.clone(),
            transcription.base_url.clone(),
        )?,
        llm: Arc::new(create_chat_client(&settings.llm)?),
        synthesizer: Arc::new(GoogleTranslateTts::from_settings(&settings.speech)),
    })
}
