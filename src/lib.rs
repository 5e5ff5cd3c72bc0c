//! Keyboard link hints for text editors.
//!
//! Given the visible text of a document (or the links of a rendered
//! preview), jumplink finds jump targets and labels each one with a short
//! letter sequence. The host draws the labels, feeds keystrokes back into a
//! [`Jumper`], and performs the [`NavigationAction`] that comes out.
//!
//! ```
//! use jumplink_lib::{AlphabetSpec, extract_links};
//!
//! let hints = extract_links("[[Alpha]] https://x.io", 0, &AlphabetSpec::new("ab"));
//! let labels: Vec<&str> = hints.iter().map(|h| h.label.as_str()).collect();
//! assert_eq!(labels, ["A", "B"]);
//! ```

pub mod alphabet;
pub mod config;
pub mod exit_codes;
pub mod extract;
pub mod keys;
pub mod labels;
pub mod lightspeed;
pub mod navigation;
pub mod session;
pub mod types;
pub mod utils;
pub mod viewport;

pub use alphabet::AlphabetSpec;
pub use config::{Config, ConfigError};
pub use extract::{
    ExtractError, HintPattern, TextWindow, extract_links, extract_links_in, extract_regex_matches,
    extract_regex_matches_in, label_live_preview, label_rendered_links,
};
pub use keys::{Key, KeyPress, parse_key_sequence};
pub use labels::{allocate, assign_labels};
pub use lightspeed::{CaptureStep, LightspeedCapture};
pub use navigation::NavigationAction;
pub use session::{Activation, Dispatch, HintSession, JumpRequest, JumpSettings, Jumper, KeyOutcome};
pub use types::{
    Candidate, CursorState, Hint, HintKind, HintTarget, Labeled, LabeledCandidate, LabeledRenderedLink,
    RenderedLink,
};
pub use utils::offsets::OffsetEncoding;
pub use viewport::visible_lines;
