//! Single insertion-target substitution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happens to the insertion target text around the fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    /// Target text stays, fragment follows it.
    #[default]
    Before,
    /// Fragment first, target text after it.
    After,
    /// Target text is removed.
    Discard,
}

/// Replace the first occurrence of `target` in `source` with `fragment`.
///
/// Returns `None` when `source` has no insertion point. Everything outside
/// the replaced span is copied unchanged.
pub fn splice(source: &str, target: &str, fragment: &str, keep: KeepPolicy) -> Option<String> {
    if target.is_empty() {
        return None;
    }
    let at = source.find(target)?;
    let (head, rest) = source.split_at(at);
    let tail = &rest[target.len()..];

    let (before, after) = match keep {
        KeepPolicy::Before => (target, ""),
        KeepPolicy::After => ("", target),
        KeepPolicy::Discard => ("", ""),
    };

    let mut out = String::with_capacity(source.len() + fragment.len());
    out.push_str(head);
    out.push_str(before);
    out.push_str(fragment);
    out.push_str(after);
    out.push_str(tail);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "<div id=masthead>";
    const PAGE: &str = "<body><div id=masthead></div><div id=masthead></div></body>";

    #[test]
    fn test_splice_before() {
        let out = splice(PAGE, TARGET, "[F]", KeepPolicy::Before).unwrap();
        assert_eq!(out, "<body><div id=masthead>[F]</div><div id=masthead></div></body>");
    }

    #[test]
    fn test_splice_after() {
        let out = splice(PAGE, TARGET, "[F]", KeepPolicy::After).unwrap();
        assert_eq!(out, "<body>[F]<div id=masthead></div><div id=masthead></div></body>");
    }

    #[test]
    fn test_splice_discard() {
        let out = splice(PAGE, TARGET, "[F]", KeepPolicy::Discard).unwrap();
        assert_eq!(out, "<body>[F]</div><div id=masthead></div></body>");
    }

    #[test]
    fn test_splice_no_target() {
        assert!(splice("<body></body>", TARGET, "[F]", KeepPolicy::Before).is_none());
        assert!(splice(PAGE, "", "[F]", KeepPolicy::Before).is_none());
    }

    #[test]
    fn test_splice_multibyte_neighbors() {
        let out = splice("héllo<!--x-->wörld", "<!--x-->", "·", KeepPolicy::Discard).unwrap();
        assert_eq!(out, "héllo·wörld");
    }

    #[test]
    fn test_keep_policy_serde() {
        let keep: KeepPolicy = serde_json::from_str("\"after\"").unwrap();
        assert_eq!(keep, KeepPolicy::After);
        assert_eq!(serde_json::to_string(&KeepPolicy::Discard).unwrap(), "\"discard\"");
    }
}
