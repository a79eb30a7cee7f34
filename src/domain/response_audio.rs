use std::path::PathBuf;

use super::storage_path::StoragePath;

pub const RESPONSE_AUDIO_MIME: &str = "audio/mpeg";

/// Synthesized reply written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAudio {
    pub storage_path: StoragePath,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ResponseAudio {
    pub fn file_name(&self) -> &str {
        self.storage_path.as_str()
    }
}
