//! The rotation pool and its acceptance rule.

use serde::Serialize;

use crate::config::InterscribeConfig;
use crate::document::{DocumentRef, QualitySignal};

/// Decides which document references may enter the pool.
#[derive(Debug, Clone)]
pub struct AcceptanceRule {
    local_host: String,
    grades: Vec<String>,
    min_score: i64,
}

impl AcceptanceRule {
    pub fn new(local_host: impl Into<String>, grades: Vec<String>, min_score: i64) -> Self {
        Self { local_host: local_host.into(), grades, min_score }
    }

    pub fn from_config(config: &InterscribeConfig) -> Self {
        Self::new(config.hostname.clone(), config.snr_grades.clone(), config.snr_min_score)
    }

    /// True when `origin` names the local serving host, either bare or as a URL.
    pub fn is_local(&self, origin: &str) -> bool {
        let origin = origin.trim();
        if origin.eq_ignore_ascii_case(&self.local_host) {
            return true;
        }
        url::Url::parse(origin)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(&self.local_host)))
            .unwrap_or(false)
    }

    pub fn accepts(&self, quality: &QualitySignal) -> bool {
        match quality {
            QualitySignal::Grade(grade) => self.grades.iter().any(|g| g == grade),
            QualitySignal::Score(score) => *score >= self.min_score,
            QualitySignal::Malformed(_) => false,
        }
    }

    /// Whether `doc` may be rotated: an external origin host and an accepted
    /// quality signal.
    pub fn eligible(&self, doc: &DocumentRef) -> bool {
        !doc.origin_host.is_empty()
            && !self.is_local(&doc.origin_host)
            && doc.quality.as_ref().is_some_and(|q| self.accepts(q))
    }
}

/// Ordered, append-only set of eligible documents in filter-file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RotationPool {
    entries: Vec<DocumentRef>,
    total: usize,
}

impl RotationPool {
    /// Append an eligible document.
    pub fn commit(&mut self, doc: DocumentRef) {
        self.entries.push(doc);
    }

    /// Count one `!url` record seen in the filter file.
    pub(crate) fn count_record(&mut self) {
        self.total += 1;
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`. Indices come from
    /// `RotationCursor::advance` against this pool's size.
    pub fn at(&self, index: usize) -> &DocumentRef {
        &self.entries[index]
    }

    pub fn get(&self, index: usize) -> Option<&DocumentRef> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRef> {
        self.entries.iter()
    }

    /// Records seen in the filter file.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn kept(&self) -> usize {
        self.entries.len()
    }

    /// Records seen but not kept, whether rejected or never complete.
    pub fn discarded(&self) -> usize {
        self.total.saturating_sub(self.kept())
    }
}
