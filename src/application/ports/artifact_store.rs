use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Write-only placement of byte streams under a fixed root directory.
///
/// A save to an existing path replaces the previous content; there is no
/// collision detection and concurrent writers to one path race.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn save(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, ArtifactStoreError>;

    /// Filesystem location of `path`, for consumers that read by path.
    fn locate(&self, path: &StoragePath) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
