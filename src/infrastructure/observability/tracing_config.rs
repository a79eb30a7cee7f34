use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_settings(settings: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment: environment.to_string(),
            json_format: settings.enable_json || env_json_format(),
            default_filter: format!("{},voxrelay=debug,tower_http=debug", settings.level),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: env_json_format(),
            default_filter: "info,voxrelay=debug,tower_http=debug".to_string(),
        }
    }
}

fn env_json_format() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false)
}
