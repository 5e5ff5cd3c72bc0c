//! Structured-link mode: wikilinks, markdown links and bare URLs.

use super::{CandidateSet, TextWindow, label_sorted};
use crate::alphabet::AlphabetSpec;
use crate::types::{Candidate, HintKind, LabeledCandidate};
use regex::Regex;
use std::sync::LazyLock;

/// One link syntax and how its matches become candidates.
pub struct LinkRule {
    pub name: &'static str,
    pub kind: HintKind,
    regex: Regex,
    /// Capture group whose start is the reported position (0 = whole match)
    position_group: usize,
    trim_payload: bool,
}

impl LinkRule {
    fn new(name: &'static str, kind: HintKind, pattern: &str) -> Self {
        Self {
            name,
            kind,
            regex: Regex::new(pattern).unwrap(),
            position_group: 0,
            trim_payload: false,
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn scan_into(&self, set: &mut CandidateSet<'_>) {
        let content = set.content();
        let mut kept = 0usize;
        for caps in self.regex.captures_iter(content) {
            let (Some(anchor), Some(target)) = (caps.get(self.position_group), caps.get(1)) else {
                continue;
            };
            let payload = if self.trim_payload {
                target.as_str().trim()
            } else {
                target.as_str()
            };
            if set.insert_if_absent(anchor.start(), self.kind, payload.to_string()) {
                kept += 1;
            }
        }
        log::trace!("[jumplink-extract] rule {} kept {kept} candidates", self.name);
    }
}

/// Link rules in priority order. When two rules match at the same position
/// the earlier rule's candidate is kept.
///
/// Markdown link titles may contain one level of balanced brackets but no
/// stray ones, otherwise a match could start at an earlier `[` and swallow
/// the links after it.
pub static LINK_RULES: LazyLock<[LinkRule; 4]> = LazyLock::new(|| {
    [
        // [[Target]] or [[Target|Title]]
        LinkRule {
            trim_payload: true,
            ..LinkRule::new("wikilink", HintKind::Internal, r"\[\[(.+?)(\|.+?)?\]\]")
        },
        // [Title](scheme://destination), checked before local links so a
        // scheme link at the same position is classified external
        LinkRule::new(
            "markdown-scheme-link",
            HintKind::External,
            r"\[(?:[^\[\]\\\n]|\\.|\[[^\[\]\n]*\])+\]\(([A-Za-z][A-Za-z0-9+.\-]*://.+?)\)",
        ),
        // [Title](../note.md), [Title](note.md), [Title](2024/note.md)
        LinkRule::new(
            "markdown-local-link",
            HintKind::Internal,
            r"\[(?:[^\[\]\\\n]|\\.|\[[^\[\]\n]*\])+\]\(((?:\.\./|\w).*?)\)",
        ),
        // Bare http(s) URL after whitespace or at the start of the window.
        // The boundary character is part of the match, so the position comes
        // from the URL group instead.
        LinkRule {
            position_group: 1,
            ..LinkRule::new("bare-url", HintKind::External, r"(?:^|\s)(https?://\S+)")
        },
    ]
});

/// Find link candidates in a window, de-duplicated by position and sorted.
pub fn find_link_candidates(window: &TextWindow<'_>) -> Vec<Candidate> {
    let mut set = CandidateSet::new(*window);
    for rule in LINK_RULES.iter() {
        rule.scan_into(&mut set);
    }
    set.into_sorted()
}

/// Extract and label the links of `window`.
pub fn extract_links_in(window: &TextWindow<'_>, alphabet: &AlphabetSpec) -> Vec<LabeledCandidate> {
    label_sorted(find_link_candidates(window), alphabet)
}

/// Extract and label the links of `content`, which starts at document offset
/// `offset` (counted in chars).
pub fn extract_links(content: &str, offset: usize, alphabet: &AlphabetSpec) -> Vec<LabeledCandidate> {
    extract_links_in(&TextWindow::new(content, offset), alphabet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ab() -> AlphabetSpec {
        AlphabetSpec::new("AB")
    }

    #[test]
    fn test_wikilinks_drop_title() {
        let content = "See [[Alpha]] and [[Beta|Bee]]";
        let hints = extract_links(content, 0, &ab());
        assert_eq!(hints.len(), 2);

        assert_eq!(hints[0].label, "A");
        assert_eq!(hints[0].target.position, 4);
        assert_eq!(hints[0].target.kind, HintKind::Internal);
        assert_eq!(hints[0].target.payload, "Alpha");

        assert_eq!(hints[1].label, "B");
        assert_eq!(hints[1].target.position, 18);
        assert_eq!(hints[1].target.payload, "Beta");
    }

    #[test]
    fn test_wikilink_target_is_trimmed() {
        let hints = extract_links("[[  Spaced Note  |x]]", 0, &ab());
        assert_eq!(hints[0].target.payload, "Spaced Note");
    }

    #[test]
    fn test_bare_url_position_points_at_scheme() {
        let hints = extract_links("Visit https://example.com now", 0, &ab());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].target.kind, HintKind::External);
        assert_eq!(hints[0].target.payload, "https://example.com");
        assert_eq!(hints[0].target.position, 6);
    }

    #[test]
    fn test_bare_url_at_start_and_after_newline() {
        let hints = extract_links("http://a.io\nhttps://b.io", 0, &ab());
        let positions: Vec<usize> = hints.iter().map(|h| h.target.position).collect();
        assert_eq!(positions, vec![0, 12]);
        assert_eq!(hints[1].target.payload, "https://b.io");
    }

    #[test]
    fn test_url_inside_other_syntax_is_not_bare() {
        let hints = extract_links("(https://example.com)", 0, &ab());
        assert!(hints.is_empty());
    }

    #[test]
    fn test_scheme_link_wins_over_local_link() {
        let hints = extract_links("[docs](https://docs.rs)", 0, &ab());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].target.kind, HintKind::External);
        assert_eq!(hints[0].target.payload, "https://docs.rs");
    }

    #[test]
    fn test_any_scheme_is_external() {
        let hints = extract_links("[file](file:///tmp/a.pdf) [z](zotero://select/items/1)", 0, &ab());
        assert_eq!(hints.len(), 2);
        assert!(hints.iter().all(|h| h.target.kind == HintKind::External));
        assert_eq!(hints[1].target.payload, "zotero://select/items/1");
    }

    #[test]
    fn test_local_links() {
        let hints = extract_links("[up](../notes/a.md) [n](2024.md) [w](word)", 0, &AlphabetSpec::new("abc"));
        let payloads: Vec<&str> = hints.iter().map(|h| h.target.payload.as_str()).collect();
        assert_eq!(payloads, vec!["../notes/a.md", "2024.md", "word"]);
        assert!(hints.iter().all(|h| h.target.kind == HintKind::Internal));
    }

    #[test]
    fn test_empty_or_odd_destinations_do_not_match() {
        assert!(extract_links("[x]()", 0, &ab()).is_empty());
        assert!(extract_links("[x](#anchor)", 0, &ab()).is_empty());
        assert!(extract_links("[x](/abs)", 0, &ab()).is_empty());
    }

    #[test]
    fn test_title_with_nested_brackets() {
        let hints = extract_links("[a [b] c](https://x.io)", 0, &ab());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].target.position, 0);
        assert_eq!(hints[0].target.kind, HintKind::External);
        assert_eq!(hints[0].target.payload, "https://x.io");

        let hints = extract_links("[see [1]](notes/ref.md)", 0, &ab());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].target.payload, "notes/ref.md");
    }

    #[test]
    fn test_stray_bracket_does_not_swallow_next_link() {
        let hints = extract_links("[x [y](a.md)", 0, &ab());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].target.position, 3);
        assert_eq!(hints[0].target.payload, "a.md");

        let hints = extract_links("[[A]] [b](c.md)", 0, &ab());
        let found: Vec<(usize, &str)> = hints.iter().map(|h| (h.target.position, h.target.payload.as_str())).collect();
        assert_eq!(found, vec![(0, "A"), (6, "c.md")]);
    }

    #[test]
    fn test_offset_is_added() {
        let hints = extract_links("go [[Home]]", 1000, &ab());
        assert_eq!(hints[0].target.position, 1003);
    }

    #[test]
    fn test_mixed_document_is_sorted() {
        let content = "https://z.io first\n[[Wiki]] then [ext](https://e.io) and [loc](loc.md)";
        let hints = extract_links(content, 0, &AlphabetSpec::new("sadfjkl"));
        let positions: Vec<usize> = hints.iter().map(|h| h.target.position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        let labels: Vec<&str> = hints.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["S", "A", "D", "F"]);
    }

    #[test]
    fn test_empty_alphabet_yields_nothing() {
        assert!(extract_links("[[A]] [[B]]", 0, &AlphabetSpec::new("")).is_empty());
    }

    #[test]
    fn test_capacity_truncation_keeps_earliest() {
        let content = "[[a]] [[b]] [[c]] [[d]] [[e]]";
        let hints = extract_links(content, 0, &ab());
        assert_eq!(hints.len(), 4);
        assert_eq!(hints.last().map(|h| h.target.payload.as_str()), Some("d"));
    }

    #[test]
    fn test_non_ascii_positions_count_chars() {
        let hints = extract_links("Über [[Ziel]]", 0, &ab());
        assert_eq!(hints[0].target.position, 5);
    }
}
