use std::io;

use bytes::Bytes;
use futures::stream;

use voxrelay::application::ports::{ArtifactStore, ArtifactStoreError};
use voxrelay::domain::StoragePath;
use voxrelay::infrastructure::storage::LocalArtifactStore;

fn create_test_store() -> (tempfile::TempDir, LocalArtifactStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalArtifactStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_valid_stream_when_saving_then_file_is_persisted() {
    let (dir, store) = create_test_store();
    let path = StoragePath::upload("test.wav");

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let size = store.save(&path, Box::pin(stream::iter(chunks))).await.unwrap();

    assert_eq!(size, 11);
    assert_eq!(std::fs::read(dir.path().join("test.wav")).unwrap(), b"hello world");
}

#[tokio::test]
async fn given_saved_file_when_locating_then_path_points_at_it() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload("clip.mp3");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.save(&path, byte_stream).await.unwrap();

    let located = store.locate(&path);
    assert!(located.starts_with(store.root()));
    assert_eq!(std::fs::read(located).unwrap(), b"data");
}

#[tokio::test]
async fn given_existing_artifact_when_saving_again_then_content_is_replaced() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::response_for("memo.wav");

    let first = Box::pin(stream::iter(vec![Ok(Bytes::from("first version, longer"))]));
    store.save(&path, first).await.unwrap();
    let second = Box::pin(stream::iter(vec![Ok(Bytes::from("second"))]));
    store.save(&path, second).await.unwrap();

    assert_eq!(std::fs::read(store.locate(&path)).unwrap(), b"second");
}

#[tokio::test]
async fn given_stream_error_when_saving_then_returns_error_and_leaves_no_file() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload("partial.wav");

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "network drop")),
    ];
    let result = store.save(&path, Box::pin(stream::iter(chunks))).await;

    assert!(matches!(result, Err(ArtifactStoreError::Io(_))));
    assert!(!store.locate(&path).exists());
}

#[tokio::test]
async fn given_empty_name_when_saving_then_returns_invalid_path() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload("");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    let result = store.save(&path, byte_stream).await;

    assert!(matches!(result, Err(ArtifactStoreError::InvalidPath(_))));
}

#[test]
fn given_missing_directory_when_creating_store_then_directory_is_created() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("nested").join("uploads");

    let store = LocalArtifactStore::new(root.clone()).unwrap();

    assert!(root.is_dir());
    assert_eq!(store.root(), &root.canonicalize().unwrap());
}

#[tokio::test]
async fn given_name_ending_in_hash_digits_when_saving_then_store_rejects_it() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload("clip#1");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    let result = store.save(&path, byte_stream).await;

    assert!(result.is_err());
    assert!(!store.locate(&path).exists());
}
