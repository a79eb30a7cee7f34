mod error;
mod health;
mod upload_audio;

pub use error::{ErrorResponse, error_response, panic_response};
pub use health::{health_handler, root_handler};
pub use upload_audio::{content_disposition, upload_audio_handler};
