//! Document references read from the filter file.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quality signal attached to a document reference.
///
/// Older filter files grade documents with a letter (`!snr:grade`), newer
/// ones with an integer score (`!snrScore`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QualitySignal {
    Grade(String),
    Score(i64),
    /// A `!snrScore` value that is not an integer. Never accepted.
    Malformed(String),
}

impl QualitySignal {
    /// Read a `!snrScore` value.
    pub fn score(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(score) => QualitySignal::Score(score),
            Err(_) => QualitySignal::Malformed(value.to_string()),
        }
    }

    /// Read a `!snr:grade` value.
    pub fn grade(value: &str) -> Self {
        QualitySignal::Grade(value.trim().to_string())
    }
}

/// One external document candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentRef {
    /// https://example.com/dir/subdir/filename
    pub url: String,
    /// https://example.com
    pub origin_host: String,
    /// YYYY-MM-DD, kept opaque
    pub last_modified: String,
    pub title: String,
    pub description: String,
    pub kicker_text: String,
    pub attribution_title: String,
    pub best_words: Vec<String>,
    pub keywords: String,
    pub topwords: String,
    pub quality: Option<QualitySignal>,
}

impl DocumentRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    /// Replace `best_words` from its comma-delimited source form.
    pub fn set_best_words(&mut self, value: &str) {
        self.best_words = value
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
    }
}
