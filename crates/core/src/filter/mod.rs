//! Filter file loading.
//!
//! The filter file is read once at startup and folded, line by line, into a
//! `RotationPool`:
//!
//! - `!url` starts a fresh record and counts it
//! - every other directive sets a field on the current record (last write wins)
//! - once both `!host` and a quality signal have been seen, eligibility is
//!   decided exactly once; an eligible record is kept, and later `!host` or
//!   quality directives for it are ignored
//! - a record that never becomes eligible is dropped silently

pub mod parser;
pub mod pool;

use std::fs;
use std::path::Path;

use crate::Error;
use crate::document::{DocumentRef, QualitySignal};

pub use parser::{Directive, FilterLine, parse_line};
pub use pool::{AcceptanceRule, RotationPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Undecided,
    Keep,
    Reject,
}

/// The record under construction.
#[derive(Debug)]
struct Pending {
    doc: DocumentRef,
    verdict: Verdict,
}

/// Fold state: the pool built so far plus the current record.
#[derive(Debug, Default)]
struct Accumulator {
    pool: RotationPool,
    current: Option<Pending>,
}

impl Accumulator {
    fn apply(mut self, line: FilterLine<'_>, rule: &AcceptanceRule) -> Self {
        let (directive, value) = match line {
            FilterLine::Directive { directive, value } => (directive, value),
            FilterLine::Unknown { keyword, value } => {
                tracing::warn!(keyword, value, "unexpected filter directive");
                return self;
            }
        };

        if directive == Directive::Url {
            self.finish_record();
            self.pool.count_record();
            self.current = Some(Pending { doc: DocumentRef::new(value), verdict: Verdict::Undecided });
            return self;
        }

        let Some(pending) = self.current.as_mut() else {
            tracing::warn!(keyword = directive.keyword(), value, "filter directive before any !url");
            return self;
        };

        if directive.decides_eligibility() && pending.verdict != Verdict::Undecided {
            tracing::debug!(
                url = %pending.doc.url,
                keyword = directive.keyword(),
                value,
                "ignoring directive after eligibility was decided"
            );
            return self;
        }

        set_field(&mut pending.doc, directive, value);

        if directive.decides_eligibility() {
            pending.decide(rule);
        }

        self
    }

    /// Close the current record, keeping it if it was found eligible.
    fn finish_record(&mut self) {
        let Some(pending) = self.current.take() else {
            return;
        };
        if pending.verdict != Verdict::Keep {
            return;
        }
        if pending.doc.url.trim().is_empty() {
            tracing::debug!(host = %pending.doc.origin_host, "dropping eligible record with empty !url");
            return;
        }
        self.pool.commit(pending.doc);
    }

    fn finish(mut self) -> RotationPool {
        self.finish_record();
        self.pool
    }
}

/// Last write wins for every field. Callers stop deciding fields once a verdict exists.
fn set_field(doc: &mut DocumentRef, directive: Directive, value: &str) {
    match directive {
        Directive::Url => doc.url = value.to_string(),
        Directive::Host => doc.origin_host = value.trim().to_string(),
        Directive::LastMod => doc.last_modified = value.to_string(),
        Directive::Title => doc.title = value.to_string(),
        Directive::Description => doc.description = value.to_string(),
        Directive::RwtTitle => doc.attribution_title = value.to_string(),
        Directive::RwtKicker => doc.kicker_text = value.to_string(),
        Directive::BestWords => doc.set_best_words(value),
        Directive::SnrGrade => doc.quality = Some(QualitySignal::grade(value)),
        Directive::SnrScore => doc.quality = Some(QualitySignal::score(value)),
        Directive::Keywords => doc.keywords = value.to_string(),
        Directive::Topwords => doc.topwords = value.to_string(),
    }
}

impl Pending {
    fn decide(&mut self, rule: &AcceptanceRule) {
        if self.verdict != Verdict::Undecided {
            return;
        }
        if self.doc.origin_host.is_empty() || self.doc.quality.is_none() {
            return;
        }
        self.verdict = if rule.eligible(&self.doc) { Verdict::Keep } else { Verdict::Reject };
    }
}

/// Build a pool from filter-file lines.
///
/// Deterministic: the same lines always yield the same pool, in file order.
pub fn build_pool<'a, I>(lines: I, rule: &AcceptanceRule) -> RotationPool
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(parse_line)
        .fold(Accumulator::default(), |acc, line| acc.apply(line, rule))
        .finish()
}

/// Read and parse the filter file.
///
/// # Errors
///
/// Returns `Error::FilterUnreadable` if the file cannot be read.
pub fn read_pool(path: &Path, rule: &AcceptanceRule) -> Result<RotationPool, Error> {
    let text =
        fs::read_to_string(path).map_err(|e| Error::FilterUnreadable(format!("{}: {e}", path.display())))?;

    let _span = tracing::info_span!("snrfilter", path = %path.display()).entered();
    let pool = build_pool(text.lines(), rule);
    tracing::info!(total = pool.total(), "{} total references", pool.total());
    tracing::info!(
        kept = pool.kept(),
        discarded = pool.discarded(),
        "{} references kept, {} discarded",
        pool.kept(),
        pool.discarded()
    );
    Ok(pool)
}

/// Like `read_pool`, but an unreadable file yields an empty pool.
pub fn load_pool(path: &Path, rule: &AcceptanceRule) -> RotationPool {
    match read_pool(path, rule) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "snrfilter file not loaded; rotation pool is empty");
            RotationPool::default()
        }
    }
}
