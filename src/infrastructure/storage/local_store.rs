use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::StoragePath;

/// Artifact store rooted at a local directory.
///
/// Writes go through object_store's multipart upload, which stages the
/// parts and renames into place on completion, so a failed upload never
/// leaves a half-written artifact at the target path.
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: PathBuf) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&root).map_err(ArtifactStoreError::Io)?;
        let root = root.canonicalize().map_err(ArtifactStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            root,
        })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

fn store_path(path: &StoragePath) -> Result<StorePath, ArtifactStoreError> {
    StorePath::parse(path.as_str())
        .map_err(|e| ArtifactStoreError::InvalidPath(e.to_string()))
        .and_then(|p| {
            if p.as_ref().is_empty() {
                Err(ArtifactStoreError::InvalidPath(format!(
                    "empty artifact name: {:?}",
                    path.as_str()
                )))
            } else {
                Ok(p)
            }
        })
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = store_path(path)?;
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(ArtifactStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(ArtifactStoreError::WriteFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(path = %path, bytes = total_bytes, "Artifact written");

        Ok(total_bytes)
    }

    fn locate(&self, path: &StoragePath) -> PathBuf {
        self.root.join(path.as_str())
    }
}
