use std::fmt;

/// Caller-supplied language code that constrains speech recognition.
///
/// The value is passed to the recognition engine as given (after trimming).
/// A blank hint is not a hint: [`LanguageHint::parse`] returns `None` and the
/// engine falls back to language auto-detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageHint(String);

impl LanguageHint {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
