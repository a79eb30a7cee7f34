use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};
use crate::presentation::config::SpeechSettings;

/// The translate_tts endpoint rejects longer `q` values.
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Speech from Google Translate's public TTS endpoint, one request per
/// chunk of text, MP3 frames concatenated in order.
pub struct GoogleTranslateTts {
    client: Client,
    base_url: String,
    language: String,
    slow: bool,
}

impl GoogleTranslateTts {
    pub fn new(base_url: &str, language: impl Into<String>, slow: bool) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.into(),
            slow,
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(&settings.base_url, settings.language.clone(), settings.slow)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Bytes, SynthesisError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let speed = if self.slow { "0.3" } else { "1" };

        let response = self
            .client
            .get(format!("{}/translate_tts", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, "http://translate.google.com/")
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.language.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| SynthesisError::RequestFailed(format!("body: {}", e)))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let part = self.fetch_chunk(chunk, idx, chunks.len()).await?;
            audio.extend_from_slice(&part);
        }

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        tracing::info!(
            chunks = chunks.len(),
            bytes = audio.len(),
            language = %self.language,
            "Speech synthesized"
        );

        Ok(audio.freeze())
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace. A single word longer than `max_chars` is cut mid-word.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_chars = needed;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

