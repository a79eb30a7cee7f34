/// Upper bound on the number of characters handed to speech synthesis.
pub const MAX_SYNTHESIS_CHARS: usize = 500;

/// Text produced by the language model for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply(String);

impl GeneratedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix of the reply that gets spoken: at most
    /// [`MAX_SYNTHESIS_CHARS`] characters, cut on a char boundary.
    pub fn for_synthesis(&self) -> &str {
        match self.0.char_indices().nth(MAX_SYNTHESIS_CHARS) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}
