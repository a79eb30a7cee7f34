use std::fmt;

use crate::application::ports::{
    ArtifactStoreError, LlmClientError, SynthesisError, TranscriptionError,
};

/// The first failure of a request. Every variant is reported to the caller
/// the same way; the variant itself only matters for logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Saving upload failed: {0}")]
    Io(#[from] ArtifactStoreError),
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("API request failed: {0}")]
    Generation(#[from] LlmClientError),
    #[error("Speech generation failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    IoFailure,
    TranscriptionFailure,
    GenerationFailure,
    SynthesisFailure,
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Io(_) => PipelineErrorKind::IoFailure,
            PipelineError::Transcription(_) => PipelineErrorKind::TranscriptionFailure,
            PipelineError::Generation(_) => PipelineErrorKind::GenerationFailure,
            PipelineError::Synthesis(_) => PipelineErrorKind::SynthesisFailure,
        }
    }
}

impl PipelineErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineErrorKind::IoFailure => "io_failure",
            PipelineErrorKind::TranscriptionFailure => "transcription_failure",
            PipelineErrorKind::GenerationFailure => "generation_failure",
            PipelineErrorKind::SynthesisFailure => "synthesis_failure",
        }
    }
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
