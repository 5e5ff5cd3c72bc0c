//! What to do once a hint has been chosen.
//!
//! The host performs the action; this module only decides which one.

use crate::types::{CursorState, HintKind, HintTarget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum NavigationAction {
    /// Open a workspace document; `new_pane` when shift was held
    OpenInternal { target: String, new_pane: bool },
    OpenExternal { url: String },
    MoveCursor { position: usize },
    /// Extend the selection from the pre-activation anchor to the target
    Select { anchor: usize, head: usize },
}

/// Decide the action for a selected hint.
///
/// Returns `None` for a regex hint without a document position, which can
/// only come from a host mixing rendered targets into a regex session.
pub fn resolve(target: &HintTarget, shift: bool, cursor: &CursorState) -> Option<NavigationAction> {
    match target.kind() {
        HintKind::Internal => Some(NavigationAction::OpenInternal {
            target: decode_link_target(target.payload()),
            new_pane: shift,
        }),
        HintKind::External => Some(NavigationAction::OpenExternal {
            url: target.payload().to_string(),
        }),
        HintKind::Regex => {
            let head = target.position()?;
            let extend = shift || cursor.in_visual_mode();
            match cursor.anchor {
                Some(anchor) if extend => Some(NavigationAction::Select { anchor, head }),
                _ => Some(NavigationAction::MoveCursor { position: head }),
            }
        }
    }
}

/// Escapes of these characters stay encoded so that a decoded target keeps
/// its path and fragment structure.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode an internal link target; malformed escapes are kept as typed.
pub fn decode_link_target(raw: &str) -> String {
    match decode_keeping_reserved(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("[jumplink-navigation] keeping undecodable link target '{raw}': {e}");
            raw.to_string()
        }
    }
}

fn decode_keeping_reserved(raw: &str) -> Result<String, std::string::FromUtf8Error> {
    let bytes = raw.as_bytes();
    let mut decoded = String::with_capacity(raw.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if is_reserved_escape(&bytes[i..]) {
            decoded.push_str(&urlencoding::decode(&raw[start..i])?);
            decoded.push_str(&raw[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    decoded.push_str(&urlencoding::decode(&raw[start..])?);
    Ok(decoded)
}

fn is_reserved_escape(bytes: &[u8]) -> bool {
    let hex = |b: u8| (b as char).to_digit(16);
    match bytes {
        [b'%', hi, lo, ..] => match (hex(*hi), hex(*lo)) {
            (Some(hi), Some(lo)) => RESERVED.contains(&((hi * 16 + lo) as u8)),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, RenderedLink};

    fn source(kind: HintKind, position: usize, payload: &str) -> HintTarget {
        HintTarget::Source(Candidate::new(position, kind, payload))
    }

    #[test]
    fn test_internal_link_is_decoded() {
        let action = resolve(&source(HintKind::Internal, 0, "My%20Note.md"), false, &CursorState::default());
        assert_eq!(
            action,
            Some(NavigationAction::OpenInternal {
                target: "My Note.md".to_string(),
                new_pane: false
            })
        );
    }

    #[test]
    fn test_malformed_escape_is_kept() {
        assert_eq!(decode_link_target("100%25"), "100%");
        assert_eq!(decode_link_target("bad%FF%FE"), "bad%FF%FE");
    }

    #[test]
    fn test_reserved_escapes_stay_encoded() {
        assert_eq!(decode_link_target("a%23b"), "a%23b");
        assert_eq!(decode_link_target("dir%2fsub%2Fnote%20one.md"), "dir%2fsub%2Fnote one.md");
        assert_eq!(decode_link_target("caf%C3%A9%3F"), "café%3F");
    }

    #[test]
    fn test_external_link() {
        let target = HintTarget::Rendered(RenderedLink::new(0, 0, HintKind::External, "https://x.io"));
        assert_eq!(
            resolve(&target, true, &CursorState::default()),
            Some(NavigationAction::OpenExternal {
                url: "https://x.io".to_string()
            })
        );
    }

    #[test]
    fn test_regex_moves_cursor() {
        let cursor = CursorState {
            anchor: Some(3),
            vim_mode: None,
        };
        assert_eq!(
            resolve(&source(HintKind::Regex, 42, ""), false, &cursor),
            Some(NavigationAction::MoveCursor { position: 42 })
        );
    }

    #[test]
    fn test_regex_extends_selection_with_shift_or_visual_mode() {
        let cursor = CursorState {
            anchor: Some(3),
            vim_mode: None,
        };
        assert_eq!(
            resolve(&source(HintKind::Regex, 42, ""), true, &cursor),
            Some(NavigationAction::Select { anchor: 3, head: 42 })
        );

        let visual = CursorState {
            anchor: Some(5),
            vim_mode: Some("visual".to_string()),
        };
        assert_eq!(
            resolve(&source(HintKind::Regex, 1, ""), false, &visual),
            Some(NavigationAction::Select { anchor: 5, head: 1 })
        );
    }

    #[test]
    fn test_shift_without_anchor_just_moves() {
        assert_eq!(
            resolve(&source(HintKind::Regex, 9, ""), true, &CursorState::default()),
            Some(NavigationAction::MoveCursor { position: 9 })
        );
    }
}
