use bytes::Bytes;

use voxrelay::domain::UploadedAudio;
use voxrelay::presentation::{ScaffoldConfig, Settings, build_app_state};

fn scaffold_settings(upload: &tempfile::TempDir, output: &tempfile::TempDir) -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.storage.upload_dir = upload.path().to_string_lossy().into_owned();
    settings.storage.output_dir = output.path().to_string_lossy().into_owned();
    settings
}

fn scaffold() -> ScaffoldConfig {
    ScaffoldConfig {
        enabled: true,
        transcript: "Hello".to_string(),
        reply: "Scaffold reply".to_string(),
    }
}

#[tokio::test]
async fn given_scaffold_mode_when_building_state_then_pipeline_runs_without_backends() {
    let upload = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    let state = build_app_state(scaffold_settings(&upload, &output), scaffold()).unwrap();
    let audio = state
        .pipeline
        .process(UploadedAudio::new(
            "hello.wav",
            vec![Bytes::from_static(b"RIFF....")],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(audio.file_name(), "hello_response.mp3");
    let written = std::fs::read(output.path().join("hello_response.mp3")).unwrap();
    assert!(written.ends_with(b"Scaffold reply"));
    assert!(upload.path().join("hello.wav").exists());
}

#[test]
fn given_missing_storage_dirs_when_building_state_then_they_are_created() {
    let base = tempfile::TempDir::new().unwrap();
    let mut settings = Settings::defaults().unwrap();
    settings.storage.upload_dir = base.path().join("in").to_string_lossy().into_owned();
    settings.storage.output_dir = base.path().join("out").to_string_lossy().into_owned();

    build_app_state(settings, scaffold()).unwrap();

    assert!(base.path().join("in").is_dir());
    assert!(base.path().join("out").is_dir());
}
