mod pipeline_error;
mod reply_pipeline;
mod speech_synthesis_service;

pub use pipeline_error::{PipelineError, PipelineErrorKind};
pub use reply_pipeline::{DEFAULT_MAX_TOKENS, ReplyPipeline};
pub use speech_synthesis_service::SpeechSynthesisService;
