//! Key names, virtual key codes and hotkey combinations.
//!
//! Codes follow the Windows virtual-key table, which is also what the
//! low-level keyboard hook reports. Generic modifiers (`shift`, `ctrl`,
//! `alt`) match both their left and right variants when observing input.

use std::fmt;

use crate::ConfigError;

const VK_SHIFT: u32 = 0x10;
const VK_CONTROL: u32 = 0x11;
const VK_MENU: u32 = 0x12;
const VK_LSHIFT: u32 = 0xA0;
const VK_RSHIFT: u32 = 0xA1;
const VK_LCONTROL: u32 = 0xA2;
const VK_RCONTROL: u32 = 0xA3;
const VK_LMENU: u32 = 0xA4;
const VK_RMENU: u32 = 0xA5;
const VK_LWIN: u32 = 0x5B;
const VK_RWIN: u32 = 0x5C;

/// Converts a key name string to a Windows virtual key code.
///
/// Supports letters, digits, F1-F24, modifiers (with `left`/`right`
/// variants), numeric keypad keys and common named keys. Matching is
/// case-insensitive and ignores spaces, `_` and `-`, so "Left Shift",
/// "left_shift" and "LShift" are the same key.
pub fn vk_from_name(name: &str) -> Option<u32> {
    let upper: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if upper.len() == 1 {
        let ch = upper.as_bytes()[0];
        if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
            return Some(u32::from(ch));
        }
    }

    if let Some(rest) = upper.strip_prefix('F')
        && let Ok(n) = rest.parse::<u32>()
        && (1..=24).contains(&n)
    {
        return Some(0x70 + n - 1);
    }

    if let Some(rest) = upper.strip_prefix("NUMPAD")
        && let Ok(n) = rest.parse::<u32>()
        && n <= 9
    {
        return Some(0x60 + n);
    }

    match upper.as_str() {
        // Modifiers
        "SHIFT" => Some(VK_SHIFT),
        "LSHIFT" | "LEFTSHIFT" => Some(VK_LSHIFT),
        "RSHIFT" | "RIGHTSHIFT" => Some(VK_RSHIFT),
        "CTRL" | "CONTROL" => Some(VK_CONTROL),
        "LCTRL" | "LEFTCTRL" | "LCONTROL" => Some(VK_LCONTROL),
        "RCTRL" | "RIGHTCTRL" | "RCONTROL" => Some(VK_RCONTROL),
        "ALT" | "MENU" => Some(VK_MENU),
        "LALT" | "LEFTALT" => Some(VK_LMENU),
        "RALT" | "RIGHTALT" | "ALTGR" => Some(VK_RMENU),
        "WIN" | "LWIN" | "LEFTWIN" => Some(VK_LWIN),
        "RWIN" | "RIGHTWIN" => Some(VK_RWIN),
        "CAPSLOCK" | "CAPITAL" => Some(0x14),

        // Navigation
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "ESCAPE" | "ESC" => Some(0x1B),
        "SPACE" => Some(0x20),
        "BACKSPACE" => Some(0x08),
        "DELETE" | "DEL" => Some(0x2E),
        "INSERT" | "INS" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" | "PGUP" => Some(0x21),
        "PAGEDOWN" | "PGDN" => Some(0x22),
        "LEFT" => Some(0x25),
        "UP" => Some(0x26),
        "RIGHT" => Some(0x27),
        "DOWN" => Some(0x28),

        // Numeric keypad operators
        "ADD" | "NUMPADPLUS" | "NUMPADADD" => Some(0x6B),
        "SUBTRACT" | "NUMPADMINUS" | "NUMPADSUBTRACT" => Some(0x6D),
        "MULTIPLY" | "NUMPADMULTIPLY" => Some(0x6A),
        "DIVIDE" | "NUMPADDIVIDE" => Some(0x6F),
        "DECIMAL" | "NUMPADDECIMAL" => Some(0x6E),

        // Punctuation / OEM keys
        "MINUS" => Some(0xBD),
        "PLUS" | "EQUALS" => Some(0xBB),
        "COMMA" => Some(0xBC),
        "PERIOD" | "DOT" => Some(0xBE),
        "SLASH" => Some(0xBF),
        "SEMICOLON" => Some(0xBA),
        "BACKSLASH" => Some(0xDC),
        "LBRACKET" => Some(0xDB),
        "RBRACKET" => Some(0xDD),
        "QUOTE" => Some(0xDE),
        "BACKTICK" | "GRAVE" => Some(0xC0),

        _ => None,
    }
}

/// Returns whether an observed key satisfies a configured key.
///
/// The hook reports sided modifier codes (`VK_LSHIFT`), so a configured
/// generic modifier accepts either side.
pub fn key_matches(configured: u32, observed: u32) -> bool {
    if configured == observed {
        return true;
    }
    match configured {
        VK_SHIFT => matches!(observed, VK_LSHIFT | VK_RSHIFT),
        VK_CONTROL => matches!(observed, VK_LCONTROL | VK_RCONTROL),
        VK_MENU => matches!(observed, VK_LMENU | VK_RMENU),
        _ => false,
    }
}

/// Returns whether the key is a modifier usable in a combination.
pub fn is_modifier(vk: u32) -> bool {
    matches!(
        vk,
        VK_SHIFT
            | VK_CONTROL
            | VK_MENU
            | VK_LSHIFT
            | VK_RSHIFT
            | VK_LCONTROL
            | VK_RCONTROL
            | VK_LMENU
            | VK_RMENU
            | VK_LWIN
            | VK_RWIN
    )
}

/// A key combination such as `ctrl+add`: modifiers held while the final
/// key is tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifiers: Vec<u32>,
    pub key: u32,
}

impl KeyCombo {
    /// Parses `mod+mod+key`. Every part but the last must be a modifier.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidHotkey {
            hotkey: text.to_string(),
            reason,
        };

        let parts: Vec<&str> = text.split('+').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty key name"));
        }

        let (last, mods) = parts.split_last().ok_or_else(|| invalid("empty combination"))?;
        let key = vk_from_name(last).ok_or_else(|| ConfigError::UnknownKey(last.to_string()))?;

        let mut modifiers = Vec::with_capacity(mods.len());
        for name in mods {
            let vk = vk_from_name(name).ok_or_else(|| ConfigError::UnknownKey(name.to_string()))?;
            if !is_modifier(vk) {
                return Err(invalid("only modifiers may precede the last key"));
            }
            if !modifiers.contains(&vk) {
                modifiers.push(vk);
            }
        }

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "0x{m:02X}+")?;
        }
        write!(f, "0x{:02X}", self.key)
    }
}

/// Parses a comma-separated list of combinations, sent in order.
pub fn parse_sequence(text: &str) -> Result<Vec<KeyCombo>, ConfigError> {
    if text.trim().is_empty() {
        return Err(ConfigError::InvalidHotkey {
            hotkey: text.to_string(),
            reason: "no key combination given",
        });
    }
    text.split(',').map(|c| KeyCombo::parse(c.trim())).collect()
}
