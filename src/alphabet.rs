//! Hint alphabet normalisation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default letters, the home-row-first ordering used by browser link-hint extensions.
pub const DEFAULT_LETTERS: &str = "sadfjklewcmpgh";

/// Ordered set of hint characters, uppercased.
///
/// Identity is case-insensitive: `"aA"` is a one-letter alphabet. Whitespace
/// and control characters cannot be typed as hints and are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AlphabetSpec {
    letters: Vec<char>,
}

impl AlphabetSpec {
    pub fn new(raw: &str) -> Self {
        let mut letters: Vec<char> = Vec::with_capacity(raw.len());
        for ch in raw.chars() {
            if ch.is_whitespace() || ch.is_control() {
                continue;
            }
            let upper = normalize_char(ch);
            if !letters.contains(&upper) {
                letters.push(upper);
            }
        }
        Self { letters }
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.letters.contains(&normalize_char(ch))
    }
}

impl Default for AlphabetSpec {
    fn default() -> Self {
        Self::new(DEFAULT_LETTERS)
    }
}

impl From<&str> for AlphabetSpec {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for AlphabetSpec {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<AlphabetSpec> for String {
    fn from(spec: AlphabetSpec) -> Self {
        spec.letters.into_iter().collect()
    }
}

impl fmt::Display for AlphabetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.letters {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Uppercase a hint character or keystroke.
///
/// Characters whose uppercase form is longer than one character (`ß`) are
/// kept unchanged so every letter stays a single keystroke.
pub fn normalize_char(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}
