//! Host-independent keystrokes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// A printable character
    Char(char),
    Escape,
    /// Shift, Control, CapsLock and friends pressed on their own
    Modifier,
    /// Anything else (arrows, function keys, Enter, ...)
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"a"`, `"Escape"`, `"Shift"`) to a key.
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Key::Char(ch);
        }
        match name {
            "Escape" | "Esc" => Key::Escape,
            "Shift" | "Control" | "Alt" | "Meta" | "CapsLock" | "ScrollLock" | "NumLock" | "AltGraph" => {
                Key::Modifier
            }
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key, shift: bool) -> Self {
        Self { key, shift }
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Char(ch), false)
    }

    pub fn shifted(ch: char) -> Self {
        Self::new(Key::Char(ch), true)
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape, false)
    }
}

/// Turn a typed string into key presses, one per character.
///
/// Uppercase letters count as shifted. `<Esc>` in the text becomes an
/// escape key, which makes scripted sessions easy to write.
pub fn parse_key_sequence(text: &str) -> Vec<KeyPress> {
    let mut presses = Vec::with_capacity(text.len());
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("<Esc>") {
            presses.push(KeyPress::escape());
            rest = after;
            continue;
        }
        presses.push(KeyPress::new(Key::Char(ch), ch.is_uppercase()));
        rest = &rest[ch.len_utf8()..];
    }
    presses
}
