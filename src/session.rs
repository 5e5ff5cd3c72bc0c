//! Hint sessions and the controller that opens them.
//!
//! A [`HintSession`] is one activation: a fixed set of labelled hints and the
//! keystrokes typed so far. [`Jumper`] owns the settings, refuses a second
//! activation while one is open, and turns a selection into a
//! [`NavigationAction`].

use crate::alphabet::{AlphabetSpec, normalize_char};
use crate::config::Config;
use crate::extract::{
    ExtractError, HintPattern, TextWindow, extract_links_in, extract_regex_matches_in, find_link_candidates,
    label_live_preview, label_rendered_links,
};
use crate::keys::{Key, KeyPress};
use crate::lightspeed::LightspeedCapture;
use crate::navigation::{NavigationAction, resolve};
use crate::types::{CursorState, Hint, HintTarget, LabeledCandidate, RenderedLink};
use crate::utils::offsets::OffsetEncoding;
use std::collections::{HashMap, HashSet};

/// Outcome of one keystroke in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Modifier key, nothing changed
    Ignored,
    /// First letter of a two-letter label; waiting for the second
    Prefix(char),
    /// A hint was chosen. `shift` is true when shift was held for either letter.
    Selected { hint: Hint, shift: bool },
    /// No hint matches; the session is over
    Cancelled,
}

impl KeyOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, KeyOutcome::Selected { .. } | KeyOutcome::Cancelled)
    }
}

#[derive(Debug, Clone)]
pub struct HintSession {
    hints: Vec<Hint>,
    by_label: HashMap<String, usize>,
    prefixes: HashSet<char>,
    pending: Option<(char, bool)>,
}

impl HintSession {
    pub fn new(hints: Vec<Hint>) -> Self {
        let by_label = hints
            .iter()
            .enumerate()
            .map(|(idx, hint)| (hint.label.clone(), idx))
            .collect();
        let prefixes = hints
            .iter()
            .filter(|hint| hint.label.chars().count() > 1)
            .filter_map(|hint| hint.label.chars().next())
            .collect();
        Self {
            hints,
            by_label,
            prefixes,
            pending: None,
        }
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn pending_prefix(&self) -> Option<char> {
        self.pending.map(|(prefix, _)| prefix)
    }

    /// Hints still reachable: all of them, or those under the typed prefix
    pub fn visible(&self) -> impl Iterator<Item = &Hint> {
        let prefix = self.pending_prefix();
        self.hints.iter().filter(move |hint| match prefix {
            Some(p) => hint.label.chars().count() > 1 && hint.label.starts_with(p),
            None => true,
        })
    }

    pub fn press(&mut self, press: KeyPress) -> KeyOutcome {
        let ch = match press.key {
            Key::Modifier => return KeyOutcome::Ignored,
            Key::Char(ch) => normalize_char(ch),
            Key::Escape | Key::Other => return KeyOutcome::Cancelled,
        };

        let (label, shift) = match self.pending.take() {
            Some((prefix, prefix_shift)) => (format!("{prefix}{ch}"), prefix_shift || press.shift),
            None => {
                let label = ch.to_string();
                if !self.by_label.contains_key(&label) && self.prefixes.contains(&ch) {
                    self.pending = Some((ch, press.shift));
                    return KeyOutcome::Prefix(ch);
                }
                (label, press.shift)
            }
        };

        match self.by_label.get(&label) {
            Some(&idx) => KeyOutcome::Selected {
                hint: self.hints[idx].clone(),
                shift,
            },
            None => KeyOutcome::Cancelled,
        }
    }
}

/// Settings the controller reads on every activation.
#[derive(Debug, Clone)]
pub struct JumpSettings {
    pub alphabet: AlphabetSpec,
    pub anywhere_pattern: String,
    pub lightspeed_case_sensitive: bool,
    pub lightspeed_start_of_word: bool,
    pub jump_if_single_target: bool,
    pub encoding: OffsetEncoding,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for JumpSettings {
    fn from(config: &Config) -> Self {
        Self {
            alphabet: config.alphabet(),
            anywhere_pattern: config.jump_to_anywhere.regex.clone(),
            lightspeed_case_sensitive: config.lightspeed.case_sensitive,
            lightspeed_start_of_word: config.lightspeed.jump_to_start_of_word,
            jump_if_single_target: config.global.jump_to_link_if_one_link_only,
            encoding: config.global.offset_encoding,
        }
    }
}

/// What the host asks to hint.
#[derive(Debug, Clone)]
pub enum JumpRequest<'a> {
    /// Links in source text
    Links(TextWindow<'a>),
    /// Links in a rendered preview
    Preview(Vec<RenderedLink>),
    /// Rendered links plus the links in the source window under them
    LivePreview {
        rendered: Vec<RenderedLink>,
        window: TextWindow<'a>,
    },
    /// The configured jump-to-anywhere pattern (case-sensitive)
    Anywhere(TextWindow<'a>),
    /// A completed lightspeed pattern, with the configured case handling
    Lightspeed { window: TextWindow<'a>, pattern: String },
    /// Any other pattern
    Regex {
        window: TextWindow<'a>,
        pattern: String,
        case_sensitive: bool,
    },
}

/// Result of an activation attempt.
#[derive(Debug)]
pub enum Activation {
    /// Another session is still open
    Busy,
    /// Nothing to hint; no session was opened
    NoTargets,
    /// The pattern does not compile; no session was opened
    Aborted(ExtractError),
    /// Exactly one target and auto-jump is on
    Jumped(NavigationAction),
    /// A session is open with these hints
    Opened(Vec<Hint>),
}

/// Result of forwarding a keystroke to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No session is open
    NoSession,
    /// The session is still open
    Pending,
    Navigate(NavigationAction),
    Cancelled,
}

/// Single-activation controller.
#[derive(Debug, Default)]
pub struct Jumper {
    settings: JumpSettings,
    session: Option<HintSession>,
    cursor: CursorState,
}

impl Jumper {
    pub fn new(settings: JumpSettings) -> Self {
        Self {
            settings,
            session: None,
            cursor: CursorState::default(),
        }
    }

    pub fn settings(&self) -> &JumpSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&HintSession> {
        self.session.as_ref()
    }

    /// A fresh two-keystroke capture using the configured word anchoring
    pub fn lightspeed_capture(&self) -> LightspeedCapture {
        LightspeedCapture::new(self.settings.lightspeed_start_of_word)
    }

    /// Start an activation. `cursor` is the selection state before the jump.
    pub fn activate(&mut self, request: JumpRequest<'_>, cursor: CursorState) -> Activation {
        if self.session.is_some() {
            log::debug!("[jumplink-session] activation refused, a session is already open");
            return Activation::Busy;
        }

        let hints = match self.collect_hints(request) {
            Ok(hints) => hints,
            Err(e) => {
                log::warn!("[jumplink-session] {e}");
                return Activation::Aborted(e);
            }
        };

        if hints.is_empty() {
            return Activation::NoTargets;
        }

        if hints.len() == 1
            && self.settings.jump_if_single_target
            && let Some(action) = resolve(&hints[0].target, false, &cursor)
        {
            return Activation::Jumped(action);
        }

        log::debug!("[jumplink-session] opened with {} hints", hints.len());
        self.cursor = cursor;
        self.session = Some(HintSession::new(hints.clone()));
        Activation::Opened(hints)
    }

    /// Feed a keystroke to the open session.
    pub fn press(&mut self, press: KeyPress) -> Dispatch {
        let Some(session) = self.session.as_mut() else {
            return Dispatch::NoSession;
        };

        match session.press(press) {
            KeyOutcome::Ignored | KeyOutcome::Prefix(_) => Dispatch::Pending,
            KeyOutcome::Selected { hint, shift } => {
                self.session = None;
                match resolve(&hint.target, shift, &self.cursor) {
                    Some(action) => Dispatch::Navigate(action),
                    None => Dispatch::Cancelled,
                }
            }
            KeyOutcome::Cancelled => {
                self.session = None;
                Dispatch::Cancelled
            }
        }
    }

    /// Close the open session, e.g. when the editor loses focus.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    fn collect_hints(&self, request: JumpRequest<'_>) -> Result<Vec<Hint>, ExtractError> {
        let alphabet = &self.settings.alphabet;
        let into_hints = |labeled: Vec<LabeledCandidate>| -> Vec<Hint> {
            labeled.into_iter().map(|l| l.map(HintTarget::from)).collect()
        };

        let hints = match request {
            JumpRequest::Links(window) => into_hints(extract_links_in(&window, alphabet)),
            JumpRequest::Preview(rendered) => label_rendered_links(rendered, alphabet)
                .into_iter()
                .map(|l| l.map(HintTarget::from))
                .collect(),
            JumpRequest::LivePreview { rendered, window } => {
                let (rendered, source) = label_live_preview(rendered, find_link_candidates(&window), alphabet);
                rendered
                    .into_iter()
                    .map(|l| l.map(HintTarget::from))
                    .chain(into_hints(source))
                    .collect()
            }
            JumpRequest::Anywhere(window) => {
                let pattern = HintPattern::new(&self.settings.anywhere_pattern, true)?;
                into_hints(extract_regex_matches_in(&window, &pattern, alphabet))
            }
            JumpRequest::Lightspeed { window, pattern } => {
                let pattern = HintPattern::new(&pattern, self.settings.lightspeed_case_sensitive)?;
                into_hints(extract_regex_matches_in(&window, &pattern, alphabet))
            }
            JumpRequest::Regex {
                window,
                pattern,
                case_sensitive,
            } => {
                let pattern = HintPattern::new(&pattern, case_sensitive)?;
                into_hints(extract_regex_matches_in(&window, &pattern, alphabet))
            }
        };
        Ok(hints)
    }
}
