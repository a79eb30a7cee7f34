mod environment;
mod scaffold_config;
mod settings;

pub use environment::Environment;
pub use scaffold_config::ScaffoldConfig;
pub use settings::{
    CorsSettings, LlmSettings, LoggingSettings, ServerSettings, Settings, SettingsError,
    SpeechSettings, StorageSettings, TranscriptionSettings,
};
