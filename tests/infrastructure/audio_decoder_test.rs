use voxrelay::application::ports::TranscriptionError;
use voxrelay::infrastructure::audio::audio_decoder::{TARGET_SAMPLE_RATE, decode_audio_to_pcm};

use crate::helpers::build_wav;

fn sine(sample_rate: u32, millis: u32) -> Vec<i16> {
    let count = sample_rate * millis / 1000;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((t * 440.0 * std::f32::consts::TAU).sin() * 8_000.0) as i16
        })
        .collect()
}

#[test]
fn given_16khz_mono_wav_when_decoding_then_samples_pass_through() {
    let samples = sine(TARGET_SAMPLE_RATE, 100);
    let wav = build_wav(TARGET_SAMPLE_RATE, 1, &samples);

    let pcm = decode_audio_to_pcm(wav, Some("wav")).unwrap();

    assert_eq!(pcm.len(), samples.len());
    assert!(pcm.iter().all(|s| (-1.0..=1.0).contains(s)));
    assert!(pcm.iter().any(|s| s.abs() > 0.1));
}

#[test]
fn given_44khz_wav_when_decoding_then_output_is_resampled_to_16khz() {
    let samples = sine(44_100, 100);
    let wav = build_wav(44_100, 1, &samples);

    let pcm = decode_audio_to_pcm(wav, Some("wav")).unwrap();

    // 100 ms at 16 kHz.
    assert!(pcm.len() <= 1600);
    assert!(pcm.len() >= 1500);
}

#[test]
fn given_stereo_wav_when_decoding_then_channels_are_averaged() {
    let frames = 800;
    let mut interleaved = Vec::with_capacity(frames * 2);
    for _ in 0..frames {
        interleaved.push(16_384);
        interleaved.push(0);
    }
    let wav = build_wav(TARGET_SAMPLE_RATE, 2, &interleaved);

    let pcm = decode_audio_to_pcm(wav, None).unwrap();

    assert_eq!(pcm.len(), frames);
    assert!(pcm.iter().all(|s| (s - 0.25).abs() < 0.01));
}

#[test]
fn given_garbage_bytes_when_decoding_then_returns_unsupported_format() {
    let result = decode_audio_to_pcm(b"definitely not audio".to_vec(), Some("wav"));

    assert!(matches!(result, Err(TranscriptionError::UnsupportedFormat(_))));
}

#[test]
fn given_wav_without_samples_when_decoding_then_returns_decoding_failed() {
    let wav = build_wav(TARGET_SAMPLE_RATE, 1, &[]);

    let result = decode_audio_to_pcm(wav, Some("wav"));

    assert!(result.is_err());
}
