use std::sync::Arc;

use voxrelay::application::services::PipelineErrorKind;

use crate::helpers::{HarnessBuilder, PanickingLlm, calls, upload};

#[tokio::test]
async fn given_working_stages_when_processing_then_stages_run_in_order_and_output_exists() {
    let harness = HarnessBuilder::new().build();

    let audio = harness
        .pipeline
        .process(upload("greeting.wav", None))
        .await
        .unwrap();

    assert_eq!(
        calls(&harness.log),
        vec![
            "upload:greeting.wav",
            "transcribe:auto",
            "complete:Hello:300",
            "synthesize:Hi there!",
            "output:greeting_response.mp3",
        ]
    );
    assert_eq!(audio.file_name(), "greeting_response.mp3");
    assert!(audio.path.starts_with(harness.output_dir.path().canonicalize().unwrap()));

    let written = std::fs::read(&audio.path).unwrap();
    assert!(!written.is_empty());
    assert_eq!(written, b"MP3:Hi there!");
    assert_eq!(audio.size_bytes, written.len() as u64);
}

#[tokio::test]
async fn given_upload_when_processing_then_raw_bytes_are_kept_in_upload_dir() {
    let harness = HarnessBuilder::new().build();

    harness
        .pipeline
        .process(upload("greeting.wav", None))
        .await
        .unwrap();

    let stored = std::fs::read(harness.upload_dir.path().join("greeting.wav")).unwrap();
    assert_eq!(stored, b"RIFFfake wav body");
}

#[tokio::test]
async fn given_reply_over_500_chars_when_processing_then_synthesis_receives_first_500() {
    let reply = format!("{}{}", "x".repeat(300), "y".repeat(400));
    let harness = HarnessBuilder::new().reply(Ok(&reply)).build();

    harness
        .pipeline
        .process(upload("long.wav", None))
        .await
        .unwrap();

    let expected = format!("synthesize:{}{}", "x".repeat(300), "y".repeat(200));
    assert!(calls(&harness.log).contains(&expected));
}

#[tokio::test]
async fn given_filename_with_several_dots_when_processing_then_output_uses_text_before_first_dot() {
    let harness = HarnessBuilder::new().build();

    let audio = harness
        .pipeline
        .process(upload("clip.v2.wav", None))
        .await
        .unwrap();

    assert_eq!(audio.file_name(), "clip_response.mp3");
    assert!(harness.output_dir.path().join("clip_response.mp3").exists());
    assert!(!harness.output_dir.path().join("clip.v2_response.mp3").exists());
}

#[tokio::test]
async fn given_failing_transcription_when_processing_then_later_stages_never_run() {
    let harness = HarnessBuilder::new()
        .transcript(Err("unsupported codec"))
        .build();

    let err = harness
        .pipeline
        .process(upload("broken.wav", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::TranscriptionFailure);
    assert!(err.to_string().starts_with("Transcription failed"));
    assert!(err.to_string().contains("unsupported codec"));
    assert_eq!(
        calls(&harness.log),
        vec!["upload:broken.wav", "transcribe:auto"]
    );
}

#[tokio::test]
async fn given_language_hint_when_processing_then_transcriber_receives_it() {
    let harness = HarnessBuilder::new().build();

    harness
        .pipeline
        .process(upload("hola.wav", Some("es")))
        .await
        .unwrap();

    assert!(calls(&harness.log).contains(&"transcribe:es".to_string()));
}

#[tokio::test]
async fn given_no_language_hint_when_processing_then_transcriber_auto_detects() {
    let harness = HarnessBuilder::new().build();

    harness
        .pipeline
        .process(upload("hola.wav", Some("  ")))
        .await
        .unwrap();

    assert!(calls(&harness.log).contains(&"transcribe:auto".to_string()));
}

#[tokio::test]
async fn given_existing_reply_for_same_filename_when_processing_then_it_is_replaced() {
    let harness = HarnessBuilder::new().reply(Ok("second reply")).build();
    let existing = harness.output_dir.path().join("memo_response.mp3");
    std::fs::write(&existing, b"an older and much longer reply body").unwrap();

    let audio = harness
        .pipeline
        .process(upload("memo.wav", None))
        .await
        .unwrap();

    assert_eq!(audio.file_name(), "memo_response.mp3");
    assert_eq!(std::fs::read(&existing).unwrap(), b"MP3:second reply");
}

#[tokio::test]
async fn given_failing_generation_when_processing_then_synthesis_is_skipped_and_upload_remains() {
    let harness = HarnessBuilder::new().reply(Err("HTTP 500: boom")).build();

    let err = harness
        .pipeline
        .process(upload("question.wav", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::GenerationFailure);
    assert!(err.to_string().starts_with("API request failed"));
    assert!(
        !calls(&harness.log)
            .iter()
            .any(|c| c.starts_with("synthesize:"))
    );
    assert!(harness.upload_dir.path().join("question.wav").exists());
}

#[tokio::test]
async fn given_failing_synthesis_when_processing_then_returns_synthesis_failure() {
    let harness = HarnessBuilder::new().failing_synthesis().build();

    let err = harness
        .pipeline
        .process(upload("greeting.wav", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::SynthesisFailure);
    assert!(err.to_string().starts_with("Speech generation failed"));
    assert!(!harness.output_dir.path().join("greeting_response.mp3").exists());
}

#[tokio::test]
async fn given_unusable_filename_when_processing_then_fails_before_transcription() {
    let harness = HarnessBuilder::new().build();

    let err = harness
        .pipeline
        .process(upload("", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::IoFailure);
    assert!(
        !calls(&harness.log)
            .iter()
            .any(|c| c.starts_with("transcribe:"))
    );
}

#[tokio::test]
async fn given_custom_token_budget_when_processing_then_llm_receives_it() {
    let harness = HarnessBuilder::new().build();
    let pipeline = harness.pipeline.with_max_tokens(120);

    pipeline.process(upload("a.wav", None)).await.unwrap();

    assert!(calls(&harness.log).contains(&"complete:Hello:120".to_string()));
}

#[tokio::test]
async fn given_concurrent_requests_when_processing_then_each_completes_independently() {
    let harness = HarnessBuilder::new().build();

    let (a, b) = tokio::join!(
        harness.pipeline.process(upload("alpha.wav", None)),
        harness.pipeline.process(upload("beta.wav", Some("de")))
    );

    assert_eq!(a.unwrap().file_name(), "alpha_response.mp3");
    assert_eq!(b.unwrap().file_name(), "beta_response.mp3");
    assert!(calls(&harness.log).contains(&"transcribe:de".to_string()));
}

#[tokio::test]
#[should_panic(expected = "backend exploded")]
async fn given_panicking_stage_when_processing_directly_then_panic_is_not_swallowed() {
    let harness = HarnessBuilder::new().llm(Arc::new(PanickingLlm)).build();

    let _ = harness.pipeline.process(upload("a.wav", None)).await;
}
