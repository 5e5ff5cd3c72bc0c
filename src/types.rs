//! Value types shared by the extractor, the label allocator and the session layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a hint points at, which decides the navigation triggered on selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    /// A document inside the same workspace (`[[Note]]`, `[x](../note.md)`)
    Internal,
    /// A URL or any other resource outside the workspace
    External,
    /// An arbitrary pattern match, only used to move the cursor
    Regex,
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintKind::Internal => write!(f, "internal"),
            HintKind::External => write!(f, "external"),
            HintKind::Regex => write!(f, "regex"),
        }
    }
}

/// A navigable target found in source text, before labelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Absolute offset into the full document, in the window's offset encoding
    pub position: usize,
    pub kind: HintKind,
    /// Link destination, or capture group 1 in regex mode
    pub payload: String,
}

impl Candidate {
    pub fn new(position: usize, kind: HintKind, payload: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            payload: payload.into(),
        }
    }
}

/// A link found in a rendered preview, positioned by pixel coordinates
/// relative to the preview container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLink {
    pub top: i32,
    pub left: i32,
    pub kind: HintKind,
    pub payload: String,
}

impl RenderedLink {
    pub fn new(top: i32, left: i32, kind: HintKind, payload: impl Into<String>) -> Self {
        Self {
            top,
            left,
            kind,
            payload: payload.into(),
        }
    }
}

/// A target plus the letter sequence that selects it.
///
/// Created once per activation and never mutated; `label` is non-empty and
/// unique among the hints of that activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<T> {
    pub label: String,
    #[serde(flatten)]
    pub target: T,
}

impl<T> Labeled<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Labeled<U> {
        Labeled {
            label: self.label,
            target: f(self.target),
        }
    }
}

pub type LabeledCandidate = Labeled<Candidate>;
pub type LabeledRenderedLink = Labeled<RenderedLink>;

/// Anything a hint session can dispatch on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum HintTarget {
    Source(Candidate),
    Rendered(RenderedLink),
}

impl HintTarget {
    pub fn kind(&self) -> HintKind {
        match self {
            HintTarget::Source(c) => c.kind,
            HintTarget::Rendered(r) => r.kind,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            HintTarget::Source(c) => &c.payload,
            HintTarget::Rendered(r) => &r.payload,
        }
    }

    /// Document position, only known for hints found in source text
    pub fn position(&self) -> Option<usize> {
        match self {
            HintTarget::Source(c) => Some(c.position),
            HintTarget::Rendered(_) => None,
        }
    }
}

impl From<Candidate> for HintTarget {
    fn from(candidate: Candidate) -> Self {
        HintTarget::Source(candidate)
    }
}

impl From<RenderedLink> for HintTarget {
    fn from(link: RenderedLink) -> Self {
        HintTarget::Rendered(link)
    }
}

/// A labelled hint as held by a session.
pub type Hint = Labeled<HintTarget>;

/// Cursor snapshot taken when an activation starts.
///
/// Vim-style editors leave visual mode before a command runs, so the
/// selection anchor has to be remembered up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorState {
    pub anchor: Option<usize>,
    pub vim_mode: Option<String>,
}

impl CursorState {
    pub fn in_visual_mode(&self) -> bool {
        matches!(self.vim_mode.as_deref(), Some("visual") | Some("visual block"))
    }
}
