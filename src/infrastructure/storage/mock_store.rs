use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::StoragePath;

/// In-memory artifact store. Nothing touches the filesystem; `locate`
/// returns a path under a fictitious root.
#[derive(Default)]
pub struct MockArtifactStore {
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &StoragePath) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .ok()
            .and_then(|a| a.get(path.as_str()).cloned())
    }

    pub fn len(&self) -> usize {
        self.artifacts.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn save(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, ArtifactStoreError> {
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        let size = data.len() as u64;
        self.artifacts
            .lock()
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?
            .insert(path.as_str().to_string(), data);
        Ok(size)
    }

    fn locate(&self, path: &StoragePath) -> PathBuf {
        PathBuf::from("/mock-artifacts").join(path.as_str())
    }
}
