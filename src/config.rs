use serde::{Deserialize, Serialize};

/// Default unknown token.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "[UNK]";

/// Default marker for word pieces that continue a word.
pub const DEFAULT_CONTINUATION_MARKER: &str = "##";

/// Default maximum word length in characters.
pub const DEFAULT_MAX_WORD_LENGTH: usize = 100;

/// Word piece splitter configuration.
///
/// Missing fields are filled in with their defaults when the
/// configuration is deserialized. An explicit `null` unknown token
/// disables the unknown token, in which case words that cannot be
/// split are looked up with the vocabulary's out-of-vocabulary
/// fallback.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct WordPiecesConfig {
    /// Token emitted for words that cannot be split.
    pub unknown_token: Option<String>,

    /// Prefix of pieces that are not word-initial, e.g. `##`.
    pub continuation_marker: String,

    /// Words with more characters than this are not split.
    pub max_word_length: usize,

    /// Emit vocabulary ids rather than piece strings.
    pub output_as_id: bool,
}

impl WordPiecesConfig {
    /// Replace unsplittable words by `unknown_token`.
    pub fn with_unknown_token(mut self, unknown_token: impl Into<String>) -> Self {
        self.unknown_token = Some(unknown_token.into());
        self
    }

    /// Look up unsplittable words through the vocabulary's
    /// out-of-vocabulary fallback instead of an unknown token.
    pub fn without_unknown_token(mut self) -> Self {
        self.unknown_token = None;
        self
    }

    /// Set the prefix of pieces that continue a word.
    pub fn with_continuation_marker(mut self, continuation_marker: impl Into<String>) -> Self {
        self.continuation_marker = continuation_marker.into();
        self
    }

    /// Set the maximum word length in characters.
    pub fn with_max_word_length(mut self, max_word_length: usize) -> Self {
        self.max_word_length = max_word_length;
        self
    }

    /// Emit vocabulary ids instead of piece strings.
    pub fn with_output_as_id(mut self, output_as_id: bool) -> Self {
        self.output_as_id = output_as_id;
        self
    }
}

impl Default for WordPiecesConfig {
    fn default() -> Self {
        WordPiecesConfig {
            unknown_token: Some(DEFAULT_UNKNOWN_TOKEN.to_string()),
            continuation_marker: DEFAULT_CONTINUATION_MARKER.to_string(),
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            output_as_id: false,
        }
    }
}
