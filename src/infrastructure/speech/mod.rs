mod google_translate_tts;
mod mock_speech_synthesizer;

pub use google_translate_tts::{GoogleTranslateTts, MAX_CHUNK_CHARS, split_text};
pub use mock_speech_synthesizer::MockSpeechSynthesizer;
