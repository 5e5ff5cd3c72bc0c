//! Target extraction.
//!
//! Every mode runs the same pipeline over a [`TextWindow`]: scan with one or
//! more patterns, keep the first candidate seen at each position, order by
//! position, label, and drop whatever the alphabet cannot label.

pub mod links;
pub mod regex_mode;
pub mod rendered;

pub use links::{LINK_RULES, LinkRule, extract_links, extract_links_in, find_link_candidates};
pub use regex_mode::{
    DEFAULT_ANYWHERE_PATTERN, HintPattern, extract_regex_matches, extract_regex_matches_in, find_regex_candidates,
};
pub use rendered::{label_live_preview, label_rendered_links};

use crate::alphabet::AlphabetSpec;
use crate::labels::assign_labels;
use crate::types::{Candidate, HintKind, LabeledCandidate};
use crate::utils::offsets::{OffsetEncoding, OffsetMap};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Errors surfaced by extraction. Everything else degrades to fewer results.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A caller-supplied pattern does not compile
    #[error("Invalid hint pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// The visible slice of a document and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWindow<'a> {
    pub content: &'a str,
    /// Absolute document offset of `content[0]`, in `encoding` units
    pub offset: usize,
    pub encoding: OffsetEncoding,
}

impl<'a> TextWindow<'a> {
    pub fn new(content: &'a str, offset: usize) -> Self {
        Self {
            content,
            offset,
            encoding: OffsetEncoding::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The whole document, starting at offset 0
    pub fn document(content: &'a str) -> Self {
        Self::new(content, 0)
    }
}

/// Position-keyed candidate collection with first-insert-wins semantics.
///
/// Iteration yields candidates in ascending position order.
pub(crate) struct CandidateSet<'a> {
    window: TextWindow<'a>,
    offsets: OffsetMap,
    by_position: BTreeMap<usize, Candidate>,
}

impl<'a> CandidateSet<'a> {
    pub(crate) fn new(window: TextWindow<'a>) -> Self {
        Self {
            offsets: OffsetMap::new(window.content, window.encoding),
            window,
            by_position: BTreeMap::new(),
        }
    }

    pub(crate) fn content(&self) -> &'a str {
        self.window.content
    }

    /// Absolute position for a byte index into the window's content
    pub(crate) fn absolute(&self, byte: usize) -> usize {
        self.window.offset + self.offsets.to_unit(byte)
    }

    /// Insert a candidate found at `byte` unless one already sits there.
    /// Returns whether it was kept.
    pub(crate) fn insert_if_absent(&mut self, byte: usize, kind: HintKind, payload: String) -> bool {
        let position = self.absolute(byte);
        match self.by_position.entry(position) {
            Entry::Vacant(slot) => {
                slot.insert(Candidate::new(position, kind, payload));
                true
            }
            Entry::Occupied(existing) => {
                log::trace!(
                    "[jumplink-extract] dropping {kind} candidate at {position}, already taken by {}",
                    existing.get().kind
                );
                false
            }
        }
    }

    pub(crate) fn into_sorted(self) -> Vec<Candidate> {
        self.by_position.into_values().collect()
    }
}

/// Label candidates that are already sorted by position.
pub(crate) fn label_sorted(candidates: Vec<Candidate>, alphabet: &AlphabetSpec) -> Vec<LabeledCandidate> {
    let found = candidates.len();
    let labeled = assign_labels(candidates, alphabet);
    log::debug!("[jumplink-extract] found {found} candidates, {} labelled", labeled.len());
    labeled
}
