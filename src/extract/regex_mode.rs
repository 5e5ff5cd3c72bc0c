//! Free-regex mode: every match of one caller-supplied pattern becomes a
//! cursor target.
//!
//! Patterns are compiled with `fancy-regex`, so look-around and
//! back-references work the way users expect from editor search boxes.

use super::{CandidateSet, ExtractError, TextWindow, label_sorted};
use crate::alphabet::AlphabetSpec;
use crate::types::{Candidate, HintKind, LabeledCandidate};
use fancy_regex::Regex;

/// Default pattern for "jump to anywhere": words of three or more characters
pub const DEFAULT_ANYWHERE_PATTERN: &str = r"\b\w{3,}\b";

/// A compiled user pattern.
///
/// The payload of each hint is capture group 1, so patterns should contain
/// one capturing group; without it every payload is empty.
#[derive(Debug, Clone)]
pub struct HintPattern {
    source: String,
    case_sensitive: bool,
    regex: Regex,
}

impl HintPattern {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, ExtractError> {
        let effective = if case_sensitive {
            pattern.to_string()
        } else {
            format!("(?i){pattern}")
        };
        let regex = Regex::new(&effective).map_err(|e| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            case_sensitive,
            regex,
        })
    }

    /// The pattern as supplied, without the case-insensitivity flag
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn scan_into(&self, set: &mut CandidateSet<'_>) {
        let content = set.content();
        for caps in self.regex.captures_iter(content) {
            let caps = match caps {
                Ok(caps) => caps,
                Err(e) => {
                    log::warn!("[jumplink-extract] stopping scan for '{}': {e}", self.source);
                    break;
                }
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let payload = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            set.insert_if_absent(whole.start(), HintKind::Regex, payload);
        }
    }
}

/// Find every match of `pattern` in the window, sorted by position.
pub fn find_regex_candidates(window: &TextWindow<'_>, pattern: &HintPattern) -> Vec<Candidate> {
    let mut set = CandidateSet::new(*window);
    pattern.scan_into(&mut set);
    set.into_sorted()
}

/// Extract and label matches of an already compiled pattern.
pub fn extract_regex_matches_in(
    window: &TextWindow<'_>,
    pattern: &HintPattern,
    alphabet: &AlphabetSpec,
) -> Vec<LabeledCandidate> {
    label_sorted(find_regex_candidates(window, pattern), alphabet)
}

/// Compile `pattern` and extract labelled matches from `content`, which
/// starts at document offset `offset` (counted in chars).
pub fn extract_regex_matches(
    content: &str,
    offset: usize,
    pattern: &str,
    alphabet: &AlphabetSpec,
    case_sensitive: bool,
) -> Result<Vec<LabeledCandidate>, ExtractError> {
    let pattern = HintPattern::new(pattern, case_sensitive)?;
    Ok(extract_regex_matches_in(
        &TextWindow::new(content, offset),
        &pattern,
        alphabet,
    ))
}
