use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::infrastructure::audio::TranscriptionProvider;

use super::Environment;

const API_KEY_FALLBACK_VARS: [&str; 2] = ["GROQ_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub speech: SpeechSettings,
    pub storage: StorageSettings,
    pub cors: CorsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub max_tokens: usize,
    /// Zero disables the client-side timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub base_url: String,
    pub language: String,
    pub slow: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: String,
    pub output_dir: String,
    pub max_upload_size_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("llm.api_key is not set (set APP_LLM__API_KEY or GROQ_API_KEY)")]
    MissingApiKey,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}.*` (optional) and
    /// `APP_*` environment variables (`__` separates sections), then checks
    /// the result with [`Settings::validate`].
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let configuration = Self::builder()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;

        if settings.llm.api_key.trim().is_empty() {
            if let Some(key) = API_KEY_FALLBACK_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            {
                settings.llm.api_key = key;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Settings with only the built-in defaults applied.
    pub fn defaults() -> Result<Self, SettingsError> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        Ok(())
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("llm.api_key", "")?
            .set_default("llm.base_url", "https://api.groq.com/openai/v1")?
            .set_default("llm.chat_model", "llama3-70b-8192")?
            .set_default("llm.max_tokens", 300)?
            .set_default("llm.timeout_secs", 60)?
            .set_default("transcription.provider", "local")?
            .set_default("transcription.model", "openai/whisper-base")?
            .set_default("speech.base_url", "https://translate.google.com")?
            .set_default("speech.language", "en")?
            .set_default("speech.slow", false)?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.output_dir", "output_audio")?
            .set_default("storage.max_upload_size_bytes", 25 * 1024 * 1024)?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:3000", "http://localhost:8000"],
            )?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)
    }
}
