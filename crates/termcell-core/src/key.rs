//! Keyboard encoding
//!
//! Turns key identifiers plus modifier flags into the byte sequences a
//! terminal-attached process expects on its input stream. Key identifiers
//! follow the common UI convention: a single character for printable keys,
//! a name (`"ArrowUp"`, `"Enter"`, ...) otherwise.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

bitflags! {
    /// Modifier state accompanying a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// Overridable byte sequences for the configurable named keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Sequence sent for Enter
    pub enter: String,
    /// Sequence sent for Escape
    pub escape: String,
    /// Sequence sent for Backspace
    pub backspace: String,
    /// Sequence sent for Delete
    pub del: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            enter: "\n".to_string(),
            escape: "\x1b".to_string(),
            backspace: "\x7f".to_string(),
            del: "\x1b[3~".to_string(),
        }
    }
}

/// A key event the encoder could not translate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key: C-{0}")]
    UnknownCtrlKey(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// Maps key identifiers to outgoing byte sequences.
#[derive(Debug, Clone, Default)]
pub struct KeyEncoder {
    bindings: KeyBindings,
}

impl KeyEncoder {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Encode a key identifier with an optional ctrl modifier.
    pub fn encode(&self, key: &str, ctrl: bool) -> Result<Vec<u8>, KeyError> {
        let mut chars = key.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        if ctrl {
            return match single {
                Some(c) if c.is_ascii_alphabetic() => {
                    Ok(vec![1 + c.to_ascii_lowercase() as u8 - b'a'])
                }
                Some('[') => Ok(vec![0x1b]),
                _ => Err(KeyError::UnknownCtrlKey(key.to_string())),
            };
        }

        // Printable keys pass through as themselves.
        if let Some(c) = single {
            let mut buf = [0u8; 4];
            return Ok(c.encode_utf8(&mut buf).as_bytes().to_vec());
        }

        let bytes: &[u8] = match key {
            "Escape" => self.bindings.escape.as_bytes(),
            "ArrowUp" => b"\x1bOA",
            "ArrowDown" => b"\x1bOB",
            "ArrowRight" => b"\x1bOC",
            "ArrowLeft" => b"\x1bOD",
            "Backspace" => self.bindings.backspace.as_bytes(),
            "Enter" => self.bindings.enter.as_bytes(),
            "Tab" => b"\t",
            "Home" => b"\x1b[1~",
            "Insert" => b"\x1b[2~",
            "Delete" => self.bindings.del.as_bytes(),
            "End" => b"\x1b[4~",
            "PageUp" => b"\x1b[5~",
            "PageDown" => b"\x1b[6~",
            _ => return Err(KeyError::UnknownKey(key.to_string())),
        };
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> KeyEncoder {
        KeyEncoder::new(KeyBindings::default())
    }

    #[test]
    fn test_plain_characters_pass_through() {
        assert_eq!(encoder().encode("a", false), Ok(b"a".to_vec()));
        assert_eq!(encoder().encode("Z", false), Ok(b"Z".to_vec()));
        assert_eq!(encoder().encode("é", false), Ok("é".as_bytes().to_vec()));
    }

    #[test]
    fn test_ctrl_letters() {
        assert_eq!(encoder().encode("c", true), Ok(vec![0x03]));
        assert_eq!(encoder().encode("A", true), Ok(vec![0x01]));
        assert_eq!(encoder().encode("z", true), Ok(vec![0x1a]));
        assert_eq!(encoder().encode("[", true), Ok(vec![0x1b]));
    }

    #[test]
    fn test_ctrl_rejects_everything_else() {
        assert_eq!(
            encoder().encode("1", true),
            Err(KeyError::UnknownCtrlKey("1".to_string()))
        );
        assert_eq!(
            encoder().encode("Enter", true),
            Err(KeyError::UnknownCtrlKey("Enter".to_string()))
        );
    }

    #[test]
    fn test_named_keys() {
        let enc = encoder();
        assert_eq!(enc.encode("ArrowUp", false), Ok(b"\x1bOA".to_vec()));
        assert_eq!(enc.encode("ArrowLeft", false), Ok(b"\x1bOD".to_vec()));
        assert_eq!(enc.encode("Tab", false), Ok(b"\t".to_vec()));
        assert_eq!(enc.encode("Home", false), Ok(b"\x1b[1~".to_vec()));
        assert_eq!(enc.encode("PageDown", false), Ok(b"\x1b[6~".to_vec()));
        assert_eq!(enc.encode("Enter", false), Ok(b"\n".to_vec()));
        assert_eq!(enc.encode("Delete", false), Ok(b"\x1b[3~".to_vec()));
    }

    #[test]
    fn test_bindings_override() {
        let enc = KeyEncoder::new(KeyBindings {
            enter: "\r".to_string(),
            ..Default::default()
        });
        assert_eq!(enc.encode("Enter", false), Ok(b"\r".to_vec()));
    }

    #[test]
    fn test_unknown_named_key() {
        assert_eq!(
            encoder().encode("F13", false),
            Err(KeyError::UnknownKey("F13".to_string()))
        );
    }
}
