/// Scaffold mode swaps the transcription, language-model and speech engines
/// for in-process mocks, so the HTTP surface runs without model downloads or
/// outbound calls.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub transcript: String,
    pub reply: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("SCAFFOLD_MODE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            transcript: std::env::var("SCAFFOLD_TRANSCRIPT")
                .unwrap_or_else(|_| "Hello".to_string()),
            reply: std::env::var("SCAFFOLD_REPLY")
                .unwrap_or_else(|_| "Hi there! This is a scaffold reply.".to_string()),
        }
    }
}
