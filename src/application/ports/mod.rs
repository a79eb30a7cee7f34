mod artifact_store;
mod llm_client;
mod speech_synthesizer;
mod transcription_engine;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use llm_client::{LlmClient, LlmClientError};
pub use speech_synthesizer::{SpeechSynthesizer, SynthesisError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
