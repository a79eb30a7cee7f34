use std::io;

use bytes::Bytes;
use futures::stream::{self, BoxStream};

use super::language_hint::LanguageHint;

/// One inbound audio clip, as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    pub original_filename: String,
    pub chunks: Vec<Bytes>,
    pub language: Option<LanguageHint>,
}

impl UploadedAudio {
    pub fn new(
        original_filename: impl Into<String>,
        chunks: Vec<Bytes>,
        language: Option<LanguageHint>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            chunks,
            language,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.len() as u64).sum()
    }

    /// Consumes the body as a byte stream for the artifact store.
    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes, io::Error>> {
        Box::pin(stream::iter(self.chunks.into_iter().map(Ok::<Bytes, io::Error>)))
    }
}
