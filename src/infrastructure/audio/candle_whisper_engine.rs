use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use candle_core::{Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::LanguageHint;

use super::audio_decoder::decode_audio_to_pcm;

const MAX_DECODE_TOKENS: usize = 224;

/// Codes with a `<|xx|>` token in multilingual Whisper vocabularies, and the
/// English name each one is also accepted under.
const WHISPER_LANGUAGES: &[(&str, &str)] = &[
    ("en", "english"),
    ("zh", "chinese"),
    ("de", "german"),
    ("es", "spanish"),
    ("ru", "russian"),
    ("ko", "korean"),
    ("fr", "french"),
    ("ja", "japanese"),
    ("pt", "portuguese"),
    ("tr", "turkish"),
    ("pl", "polish"),
    ("ca", "catalan"),
    ("nl", "dutch"),
    ("ar", "arabic"),
    ("sv", "swedish"),
    ("it", "italian"),
    ("id", "indonesian"),
    ("hi", "hindi"),
    ("fi", "finnish"),
    ("vi", "vietnamese"),
    ("he", "hebrew"),
    ("uk", "ukrainian"),
    ("el", "greek"),
    ("ms", "malay"),
    ("cs", "czech"),
    ("ro", "romanian"),
    ("da", "danish"),
    ("hu", "hungarian"),
    ("ta", "tamil"),
    ("no", "norwegian"),
    ("th", "thai"),
    ("ur", "urdu"),
    ("hr", "croatian"),
    ("bg", "bulgarian"),
    ("lt", "lithuanian"),
    ("la", "latin"),
    ("mi", "maori"),
    ("ml", "malayalam"),
    ("cy", "welsh"),
    ("sk", "slovak"),
    ("te", "telugu"),
    ("fa", "persian"),
    ("lv", "latvian"),
    ("bn", "bengali"),
    ("sr", "serbian"),
    ("az", "azerbaijani"),
    ("sl", "slovenian"),
    ("kn", "kannada"),
    ("et", "estonian"),
    ("mk", "macedonian"),
    ("br", "breton"),
    ("eu", "basque"),
    ("is", "icelandic"),
    ("hy", "armenian"),
    ("ne", "nepali"),
    ("mn", "mongolian"),
    ("bs", "bosnian"),
    ("kk", "kazakh"),
    ("sq", "albanian"),
    ("sw", "swahili"),
    ("gl", "galician"),
    ("mr", "marathi"),
    ("pa", "punjabi"),
    ("si", "sinhala"),
    ("km", "khmer"),
    ("sn", "shona"),
    ("yo", "yoruba"),
    ("so", "somali"),
    ("af", "afrikaans"),
    ("oc", "occitan"),
    ("ka", "georgian"),
    ("be", "belarusian"),
    ("tg", "tajik"),
    ("sd", "sindhi"),
    ("gu", "gujarati"),
    ("am", "amharic"),
    ("yi", "yiddish"),
    ("lo", "lao"),
    ("uz", "uzbek"),
    ("fo", "faroese"),
    ("ht", "haitian creole"),
    ("ps", "pashto"),
    ("tk", "turkmen"),
    ("nn", "nynorsk"),
    ("mt", "maltese"),
    ("sa", "sanskrit"),
    ("lb", "luxembourgish"),
    ("my", "myanmar"),
    ("bo", "tibetan"),
    ("tl", "tagalog"),
    ("mg", "malagasy"),
    ("as", "assamese"),
    ("tt", "tatar"),
    ("haw", "hawaiian"),
    ("ln", "lingala"),
    ("ha", "hausa"),
    ("ba", "bashkir"),
    ("jw", "javanese"),
    ("su", "sundanese"),
];

const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("burmese", "my"),
    ("valencian", "ca"),
    ("flemish", "nl"),
    ("haitian", "ht"),
    ("letzeburgesch", "lb"),
    ("pushto", "ps"),
    ("panjabi", "pa"),
    ("moldavian", "ro"),
    ("moldovan", "ro"),
    ("sinhalese", "si"),
    ("castilian", "es"),
    ("mandarin", "zh"),
];

/// Resolves a caller's language hint to a Whisper language code.
///
/// Case-insensitive; accepts the code itself ("es"), the English name
/// ("Spanish") or a common alias ("Castilian"). `None` if Whisper has no
/// such language.
pub fn whisper_language_code(hint: &str) -> Option<&'static str> {
    let wanted = hint.trim().to_lowercase();

    WHISPER_LANGUAGES
        .iter()
        .find(|(code, name)| *code == wanted || *name == wanted)
        .map(|(code, _)| *code)
        .or_else(|| {
            LANGUAGE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == wanted)
                .map(|(_, code)| *code)
        })
}

/// Whisper running in-process on candle.
///
/// Weights are loaded once in [`CandleWhisperEngine::new`] and shared by all
/// requests. Decoding and inference run on the blocking pool. The decoder
/// keeps a KV cache, so the model sits behind a mutex and inference is
/// serialized per engine instance.
pub struct CandleWhisperEngine {
    whisper: Arc<WhisperModel>,
}

struct WhisperModel {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
    multilingual: bool,
}

impl CandleWhisperEngine {
    pub fn new(model_id: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle Whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let config: Config = serde_json::from_str(
            &std::fs::read_to_string(&config_path)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?,
        )
        .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_file = match config.num_mel_bins {
            80 => "melfilters.bytes",
            128 => "melfilters128.bytes",
            n => {
                return Err(TranscriptionError::ModelLoadFailed(format!(
                    "unsupported number of mel bins: {}",
                    n
                )));
            }
        };
        let mel_filters = read_mel_filters(&fetch_mel_filters(&api, mel_file)?, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        let multilingual = !model_id.ends_with(".en");

        tracing::info!(multilingual, "Candle Whisper engine loaded successfully");

        Ok(Self {
            whisper: Arc::new(WhisperModel {
                model: Mutex::new(model),
                tokenizer,
                config,
                device,
                mel_filters,
                multilingual,
            }),
        })
    }
}

impl WhisperModel {
    fn mel_windows(&self, pcm: &[f32]) -> Result<Vec<Tensor>, TranscriptionError> {
        let n_mel = self.config.num_mel_bins;
        pcm.chunks(m::N_SAMPLES)
            .map(|chunk| {
                let mut samples = chunk.to_vec();
                samples.resize(m::N_SAMPLES, 0.0);
                let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
                let n_frames = mel_data.len() / n_mel;
                Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                    .map_err(|e| inference_error("mel tensor", e))
            })
            .collect()
    }

    /// `None` means no language token: auto-detect on multilingual models,
    /// English on `.en` checkpoints.
    fn language_token(&self, hint: &LanguageHint) -> Result<Option<u32>, TranscriptionError> {
        let code = whisper_language_code(hint.as_str())
            .ok_or_else(|| TranscriptionError::UnsupportedLanguage(hint.to_string()))?;

        if !self.multilingual {
            if code == "en" {
                return Ok(None);
            }
            return Err(TranscriptionError::UnsupportedLanguage(format!(
                "{} (model is English-only)",
                hint
            )));
        }

        self.tokenizer
            .token_to_id(&format!("<|{}|>", code))
            .map(Some)
            .ok_or_else(|| TranscriptionError::UnsupportedLanguage(hint.to_string()))
    }

    fn transcribe_pcm(
        &self,
        pcm: &[f32],
        language: Option<&LanguageHint>,
    ) -> Result<String, TranscriptionError> {
        let mel_windows = self.mel_windows(pcm)?;
        let mut language_token = match language {
            Some(hint) => self.language_token(hint)?,
            None => None,
        };

        let mut model = self.model.lock().map_err(|_| {
            TranscriptionError::TranscriptionFailed("whisper model lock poisoned".to_string())
        })?;
        let mut segments: Vec<String> = Vec::new();

        for (i, mel) in mel_windows.iter().enumerate() {
            let audio_features = model
                .encoder
                .forward(mel, true)
                .map_err(|e| inference_error("encoder", e))?;

            if language_token.is_none() && self.multilingual {
                language_token = Some(detect_language(
                    &mut model,
                    &self.tokenizer,
                    &self.device,
                    &audio_features,
                )?);
            }

            tracing::debug!(segment = i, "Transcribing audio segment");
            let text = decode_segment(
                &mut model,
                &self.tokenizer,
                &self.device,
                &audio_features,
                language_token,
            )?;
            if !text.is_empty() {
                segments.push(text);
            }
        }

        let transcript = segments.join(" ");

        tracing::info!(
            segments = segments.len(),
            chars = transcript.len(),
            language = language.map(LanguageHint::as_str).unwrap_or("auto"),
            "Audio transcription completed"
        );

        Ok(transcript)
    }
}

#[async_trait]
impl TranscriptionEngine for CandleWhisperEngine {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&LanguageHint>,
    ) -> Result<String, TranscriptionError> {
        let data = tokio::fs::read(audio_path).await.map_err(|e| {
            TranscriptionError::DecodingFailed(format!("read {}: {}", audio_path.display(), e))
        })?;
        let extension = audio_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);
        let language = language.cloned();
        let whisper = Arc::clone(&self.whisper);

        tokio::task::spawn_blocking(move || {
            let pcm = decode_audio_to_pcm(data, extension.as_deref())?;
            whisper.transcribe_pcm(&pcm, language.as_ref())
        })
        .await
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("inference task: {}", e)))?
    }
}

fn detect_language(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    audio_features: &Tensor,
) -> Result<u32, TranscriptionError> {
    let sot_token = token_id(tokenizer, m::SOT_TOKEN)?;
    let candidates: Vec<(&str, u32)> = WHISPER_LANGUAGES
        .iter()
        .filter_map(|(code, _)| {
            tokenizer
                .token_to_id(&format!("<|{}|>", code))
                .map(|id| (*code, id))
        })
        .collect();

    if candidates.is_empty() {
        return Err(TranscriptionError::TranscriptionFailed(
            "tokenizer has no language tokens".to_string(),
        ));
    }

    let tokens = Tensor::new(&[[sot_token]], device).map_err(|e| inference_error("tokens", e))?;
    let ys = model
        .decoder
        .forward(&tokens, audio_features, true)
        .map_err(|e| inference_error("decoder", e))?;
    let logits = model
        .decoder
        .final_linear(&ys.i(..1).map_err(|e| inference_error("slice", e))?)
        .and_then(|l| l.i(0))
        .and_then(|l| l.i(0))
        .map_err(|e| inference_error("linear", e))?;

    let ids: Vec<u32> = candidates.iter().map(|(_, id)| *id).collect();
    let ids_tensor = Tensor::new(ids.as_slice(), device).map_err(|e| inference_error("ids", e))?;
    let best = logits
        .index_select(&ids_tensor, 0)
        .and_then(|l| l.argmax(0))
        .and_then(|l| l.to_scalar::<u32>())
        .map_err(|e| inference_error("language argmax", e))? as usize;

    model.reset_kv_cache();

    let (code, id) = candidates[best.min(candidates.len() - 1)];
    tracing::debug!(language = code, "Detected spoken language");
    Ok(id)
}

fn decode_segment(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    audio_features: &Tensor,
    language_token: Option<u32>,
) -> Result<String, TranscriptionError> {
    let sot_token = token_id(tokenizer, m::SOT_TOKEN)?;
    let transcribe_token = token_id(tokenizer, m::TRANSCRIBE_TOKEN)?;
    let no_timestamps_token = token_id(tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
    let eot_token = token_id(tokenizer, m::EOT_TOKEN)?;

    let mut tokens = vec![sot_token];
    tokens.extend(language_token);
    tokens.push(transcribe_token);
    tokens.push(no_timestamps_token);

    let mut generated: Vec<u32> = Vec::new();

    for step in 0..MAX_DECODE_TOKENS {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| inference_error("tokens", e))?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, audio_features, step == 0)
            .map_err(|e| inference_error("decoder", e))?;

        let logits = decoder_output
            .squeeze(0)
            .and_then(|o| model.decoder.final_linear(&o))
            .map_err(|e| inference_error("linear", e))?;

        let seq_len = logits.dim(0).map_err(|e| inference_error("logits", e))?;
        let next_token = logits
            .get(seq_len - 1)
            .and_then(|l| l.argmax(0))
            .and_then(|l| l.to_scalar::<u32>())
            .map_err(|e| inference_error("argmax", e))?;

        if next_token == eot_token {
            break;
        }

        tokens.push(next_token);
        generated.push(next_token);
    }

    model.reset_kv_cache();

    let text = tokenizer
        .decode(&generated, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("detokenize: {}", e)))?;

    Ok(text.trim().to_string())
}

fn inference_error(step: &str, e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(format!("{}: {}", step, e))
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        TranscriptionError::TranscriptionFailed(format!("token not found: {}", token))
    })
}

fn fetch_mel_filters(api: &Api, file: &str) -> Result<Vec<u8>, TranscriptionError> {
    let mel_repo = api.repo(Repo::new(
        "FL33TW00D-HF/whisper-base".to_string(),
        RepoType::Model,
    ));
    let path = mel_repo
        .get(file)
        .map_err(|e| TranscriptionError::ModelLoadFailed(format!("{}: {}", file, e)))?;
    std::fs::read(&path)
        .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
