//! Conversion of regex byte indices into the offset unit the host editor uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit in which document offsets are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    /// Unicode scalar values
    #[default]
    Char,
    /// UTF-16 code units, as counted by browser-based editors
    Utf16,
    /// UTF-8 bytes
    Utf8,
}

impl fmt::Display for OffsetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetEncoding::Char => write!(f, "char"),
            OffsetEncoding::Utf16 => write!(f, "utf16"),
            OffsetEncoding::Utf8 => write!(f, "utf8"),
        }
    }
}

impl FromStr for OffsetEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "char" | "chars" | "utf32" => Ok(OffsetEncoding::Char),
            "utf16" | "utf-16" => Ok(OffsetEncoding::Utf16),
            "utf8" | "utf-8" | "byte" | "bytes" => Ok(OffsetEncoding::Utf8),
            _ => Err(format!("Unknown offset encoding: {s}")),
        }
    }
}

impl OffsetEncoding {
    /// Width of `text` in this unit
    pub fn len_of(self, text: &str) -> usize {
        match self {
            OffsetEncoding::Char => text.chars().count(),
            OffsetEncoding::Utf16 => text.encode_utf16().count(),
            OffsetEncoding::Utf8 => text.len(),
        }
    }

    fn char_width(self, ch: char) -> usize {
        match self {
            OffsetEncoding::Char => 1,
            OffsetEncoding::Utf16 => ch.len_utf16(),
            OffsetEncoding::Utf8 => ch.len_utf8(),
        }
    }
}

/// Byte-to-unit lookup table for one piece of text.
///
/// ASCII text (and UTF-8 offsets) need no table: the byte index already is
/// the answer.
pub struct OffsetMap {
    /// `(byte_start, unit_start)` of every char plus the end of text, sorted by byte
    boundaries: Option<Vec<(usize, usize)>>,
}

impl OffsetMap {
    pub fn new(content: &str, encoding: OffsetEncoding) -> Self {
        if encoding == OffsetEncoding::Utf8 || content.is_ascii() {
            return Self { boundaries: None };
        }

        let mut boundaries = Vec::with_capacity(content.len());
        let mut unit = 0;
        for (byte, ch) in content.char_indices() {
            boundaries.push((byte, unit));
            unit += encoding.char_width(ch);
        }
        boundaries.push((content.len(), unit));
        Self {
            boundaries: Some(boundaries),
        }
    }

    /// Convert a byte index that lies on a char boundary.
    pub fn to_unit(&self, byte: usize) -> usize {
        match &self.boundaries {
            None => byte,
            Some(table) => match table.binary_search_by_key(&byte, |&(b, _)| b) {
                Ok(idx) => table[idx].1,
                // Not a boundary: report the start of the enclosing char
                Err(idx) => table[idx.saturating_sub(1)].1,
            },
        }
    }
}
