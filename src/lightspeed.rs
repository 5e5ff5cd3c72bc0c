//! Lightspeed jump: capture two characters, then jump to their occurrences.
//!
//! The capture is a small state machine owned by the host, which feeds it
//! every keystroke while it is active:
//!
//! ```text
//! Idle --start--> AwaitingChar1 --char--> AwaitingChar2 --char--> Idle (Complete)
//!                       |                       |
//!                       +-------- Escape -------+--> Idle (Cancelled)
//! ```

use crate::alphabet::normalize_char;
use crate::extract::{ExtractError, HintPattern};
use crate::keys::{Key, KeyPress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    AwaitingChar1,
    AwaitingChar2 { first: char },
}

/// Result of feeding one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStep {
    /// The capture is not running; the key was not consumed
    Ignored,
    /// Waiting for more characters
    Pending,
    Cancelled,
    /// Both characters captured; the search pattern is ready
    Complete(String),
}

#[derive(Debug, Clone, Default)]
pub struct LightspeedCapture {
    state: CaptureState,
    start_of_word: bool,
}

impl LightspeedCapture {
    pub fn new(start_of_word: bool) -> Self {
        Self {
            state: CaptureState::Idle,
            start_of_word,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != CaptureState::Idle
    }

    pub fn start(&mut self) {
        self.state = CaptureState::AwaitingChar1;
    }

    pub fn cancel(&mut self) {
        self.state = CaptureState::Idle;
    }

    pub fn feed(&mut self, press: KeyPress) -> CaptureStep {
        if self.state == CaptureState::Idle {
            return CaptureStep::Ignored;
        }

        let ch = match press.key {
            Key::Escape => {
                self.state = CaptureState::Idle;
                return CaptureStep::Cancelled;
            }
            Key::Char(ch) if press.shift => normalize_char(ch),
            Key::Char(ch) => ch,
            Key::Modifier | Key::Other => return CaptureStep::Pending,
        };

        match self.state {
            CaptureState::AwaitingChar1 => {
                self.state = CaptureState::AwaitingChar2 { first: ch };
                CaptureStep::Pending
            }
            CaptureState::AwaitingChar2 { first } => {
                self.state = CaptureState::Idle;
                CaptureStep::Complete(build_pattern(&[first, ch], self.start_of_word))
            }
            CaptureState::Idle => CaptureStep::Ignored,
        }
    }
}

/// Literal search for `chars`, optionally anchored to the start of a word.
pub fn build_pattern(chars: &[char], start_of_word: bool) -> String {
    let literal: String = chars.iter().collect();
    let escaped = regex::escape(&literal);
    if start_of_word {
        format!(r"\b{escaped}")
    } else {
        escaped
    }
}

/// Compile a completed lightspeed pattern with the configured case handling.
pub fn compile(pattern: &str, case_sensitive: bool) -> Result<HintPattern, ExtractError> {
    HintPattern::new(pattern, case_sensitive)
}
