//! HTML fragment rendering for a rotated document.
//!
//! Rendering is pure: the same document and background always produce the
//! same bytes.

use std::ops::Range;

use crate::document::DocumentRef;

const HEADING_WORDS: Range<usize> = 0..2;
const SUBHEADING_WORDS: Range<usize> = 2..5;
const TERM_WORDS: Range<usize> = 5..7;

/// Render the fragment that replaces the insertion target.
pub fn render_fragment(doc: &DocumentRef, background: &str) -> String {
    let kicker = doc.kicker_text.replace(['\'', '"'], "");
    let h2 = phrase(&doc.best_words, HEADING_WORDS);
    let h3 = phrase(&doc.best_words, SUBHEADING_WORDS);
    let dt = phrase(&doc.best_words, TERM_WORDS);

    format!(
        "\n<script src='/node_modules/rwt-newton/rwt-newton.js' type=module></script>\n\
         <rwt-newton role=navigation background='{background}'>\n\
         \t<span slot=h2>{h2}</span>\n\
         \t<span slot=h3>{h3}</span>\n\
         \t<span slot=dt>{dt}</span>\n\
         \t<span slot=dd><a href='{url}' title='{kicker}'>{title}</a> {description}</span>\n\
         </rwt-newton>\n",
        url = doc.url,
        title = doc.attribution_title,
        description = doc.description,
    )
}

/// Join `words[range]` with single spaces and capitalize the first character.
///
/// 'one,two,three' sliced 0..2 --> 'One two'. Slices past the end are empty.
pub fn phrase(words: &[String], range: Range<usize>) -> String {
    let start = range.start.min(words.len());
    let end = range.end.clamp(start, words.len());
    capitalize_first(&words[start..end].join(" "))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
