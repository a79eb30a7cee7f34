use std::fmt;

const RESPONSE_SUFFIX: &str = "_response";
const RESPONSE_EXTENSION: &str = "mp3";

/// Location of an artifact relative to the root of its store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    /// Path under the upload directory, keyed by the caller's filename.
    pub fn upload(original_filename: &str) -> Self {
        Self(file_name_component(original_filename).to_string())
    }

    /// Path under the output directory for the reply to `original_filename`.
    ///
    /// The base name is everything before the *first* `.`, so `clip.v2.wav`
    /// maps to `clip_response.mp3`. Two uploads sharing that prefix share the
    /// same output path.
    pub fn response_for(original_filename: &str) -> Self {
        let name = file_name_component(original_filename);
        let base = name.split('.').next().unwrap_or_default();
        Self(format!("{}{}.{}", base, RESPONSE_SUFFIX, RESPONSE_EXTENSION))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Client filenames may carry directory parts ("../../x.wav", "C:\\x.wav").
fn file_name_component(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}
