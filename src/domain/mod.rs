mod generated_reply;
mod language_hint;
mod pipeline_stage;
mod response_audio;
mod storage_path;
mod uploaded_audio;

pub use generated_reply::{GeneratedReply, MAX_SYNTHESIS_CHARS};
pub use language_hint::LanguageHint;
pub use pipeline_stage::PipelineStage;
pub use response_audio::{RESPONSE_AUDIO_MIME, ResponseAudio};
pub use storage_path::StoragePath;
pub use uploaded_audio::UploadedAudio;
