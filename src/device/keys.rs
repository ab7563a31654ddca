//! Device key codes (Android `KeyEvent` numbering) and meta-state bits.

pub const META_SHIFT_ON: u32 = 0x1;
pub const META_ALT_ON: u32 = 0x2;
pub const META_CTRL_ON: u32 = 0x1000;
pub const META_META_ON: u32 = 0x10000;

/// Keys with a name callers can use instead of a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Modifiers
    Control, Alt, Shift, Meta,

    // Navigation
    Up, Down, Left, Right,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Enter, Tab, Escape, Space,

    // Special
    Insert, PrintScreen, ScrollLock, Pause,
    CapsLock, NumLock,

    // Device navigation
    Back, HomeScreen,
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E, KeyCode::F, KeyCode::G,
    KeyCode::H, KeyCode::I, KeyCode::J, KeyCode::K, KeyCode::L, KeyCode::M, KeyCode::N,
    KeyCode::O, KeyCode::P, KeyCode::Q, KeyCode::R, KeyCode::S, KeyCode::T, KeyCode::U,
    KeyCode::V, KeyCode::W, KeyCode::X, KeyCode::Y, KeyCode::Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Num0, KeyCode::Num1, KeyCode::Num2, KeyCode::Num3, KeyCode::Num4,
    KeyCode::Num5, KeyCode::Num6, KeyCode::Num7, KeyCode::Num8, KeyCode::Num9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
    KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
];

impl KeyCode {
    /// Device key code for this key.
    pub fn code(self) -> u32 {
        match self {
            // Letters
            KeyCode::A => 29,
            KeyCode::B => 30,
            KeyCode::C => 31,
            KeyCode::D => 32,
            KeyCode::E => 33,
            KeyCode::F => 34,
            KeyCode::G => 35,
            KeyCode::H => 36,
            KeyCode::I => 37,
            KeyCode::J => 38,
            KeyCode::K => 39,
            KeyCode::L => 40,
            KeyCode::M => 41,
            KeyCode::N => 42,
            KeyCode::O => 43,
            KeyCode::P => 44,
            KeyCode::Q => 45,
            KeyCode::R => 46,
            KeyCode::S => 47,
            KeyCode::T => 48,
            KeyCode::U => 49,
            KeyCode::V => 50,
            KeyCode::W => 51,
            KeyCode::X => 52,
            KeyCode::Y => 53,
            KeyCode::Z => 54,
            // Numbers
            KeyCode::Num0 => 7,
            KeyCode::Num1 => 8,
            KeyCode::Num2 => 9,
            KeyCode::Num3 => 10,
            KeyCode::Num4 => 11,
            KeyCode::Num5 => 12,
            KeyCode::Num6 => 13,
            KeyCode::Num7 => 14,
            KeyCode::Num8 => 15,
            KeyCode::Num9 => 16,
            // Function keys
            KeyCode::F1 => 131,
            KeyCode::F2 => 132,
            KeyCode::F3 => 133,
            KeyCode::F4 => 134,
            KeyCode::F5 => 135,
            KeyCode::F6 => 136,
            KeyCode::F7 => 137,
            KeyCode::F8 => 138,
            KeyCode::F9 => 139,
            KeyCode::F10 => 140,
            KeyCode::F11 => 141,
            KeyCode::F12 => 142,
            KeyCode::Control => 113,
            KeyCode::Alt => 57,
            KeyCode::Shift => 59,
            KeyCode::Meta => 117,
            KeyCode::Up => 19,
            KeyCode::Down => 20,
            KeyCode::Left => 21,
            KeyCode::Right => 22,
            KeyCode::Home => 122,
            KeyCode::End => 123,
            KeyCode::PageUp => 92,
            KeyCode::PageDown => 93,
            KeyCode::Backspace => 67,
            KeyCode::Delete => 112,
            KeyCode::Enter => 66,
            KeyCode::Tab => 61,
            KeyCode::Escape => 111,
            KeyCode::Space => 62,
            KeyCode::Insert => 124,
            KeyCode::PrintScreen => 120,
            KeyCode::ScrollLock => 116,
            KeyCode::Pause => 121,
            KeyCode::CapsLock => 115,
            KeyCode::NumLock => 143,
            KeyCode::Back => 4,
            KeyCode::HomeScreen => 3,
        }
    }

    /// Reverse lookup of [`KeyCode::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            29..=54 => Some(LETTERS[(code - 29) as usize]),
            7..=16 => Some(DIGITS[(code - 7) as usize]),
            131..=142 => Some(FUNCTION_KEYS[(code - 131) as usize]),
            _ => Self::NAMED.into_iter().find(|k| k.code() == code),
        }
    }

    const NAMED: [KeyCode; 26] = [
        KeyCode::Control, KeyCode::Alt, KeyCode::Shift, KeyCode::Meta,
        KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right,
        KeyCode::Home, KeyCode::End, KeyCode::PageUp, KeyCode::PageDown,
        KeyCode::Backspace, KeyCode::Delete, KeyCode::Enter, KeyCode::Tab,
        KeyCode::Escape, KeyCode::Space, KeyCode::Insert, KeyCode::PrintScreen,
        KeyCode::ScrollLock, KeyCode::Pause, KeyCode::CapsLock, KeyCode::NumLock,
        KeyCode::Back, KeyCode::HomeScreen,
    ];

    /// Parse a key from its name (for tool input)
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let mut chars = lower.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Some(LETTERS[(c as u8 - b'a') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }
        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
            if (1..=12).contains(&n) {
                return Some(FUNCTION_KEYS[n - 1]);
            }
        }
        match lower.as_str() {
            "ctrl" | "control" => Some(KeyCode::Control),
            "alt" => Some(KeyCode::Alt),
            "shift" => Some(KeyCode::Shift),
            "meta" | "win" | "cmd" | "command" => Some(KeyCode::Meta),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "left" => Some(KeyCode::Left),
            "right" => Some(KeyCode::Right),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            "pageup" | "pgup" => Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => Some(KeyCode::PageDown),
            "backspace" | "bs" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "enter" | "return" => Some(KeyCode::Enter),
            "tab" => Some(KeyCode::Tab),
            "escape" | "esc" => Some(KeyCode::Escape),
            "space" => Some(KeyCode::Space),
            "insert" | "ins" => Some(KeyCode::Insert),
            "printscreen" | "prtsc" => Some(KeyCode::PrintScreen),
            "scrolllock" => Some(KeyCode::ScrollLock),
            "pause" => Some(KeyCode::Pause),
            "capslock" => Some(KeyCode::CapsLock),
            "numlock" => Some(KeyCode::NumLock),
            "back" => Some(KeyCode::Back),
            "home_screen" | "homescreen" => Some(KeyCode::HomeScreen),
            _ => None,
        }
    }
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Meta, // Windows key / Command key
}

impl Modifier {
    pub fn key_code(self) -> KeyCode {
        match self {
            Modifier::Control => KeyCode::Control,
            Modifier::Alt => KeyCode::Alt,
            Modifier::Shift => KeyCode::Shift,
            Modifier::Meta => KeyCode::Meta,
        }
    }

    /// Modifiers set in a meta-state bit mask, in press order.
    pub fn from_meta_state(meta_state: u32) -> Vec<Modifier> {
        [
            (META_CTRL_ON, Modifier::Control),
            (META_ALT_ON, Modifier::Alt),
            (META_SHIFT_ON, Modifier::Shift),
            (META_META_ON, Modifier::Meta),
        ]
        .into_iter()
        .filter(|(bit, _)| meta_state & bit != 0)
        .map(|(_, m)| m)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_parsing() {
        assert_eq!(KeyCode::from_name("a"), Some(KeyCode::A));
        assert_eq!(KeyCode::from_name("CTRL"), Some(KeyCode::Control));
        assert_eq!(KeyCode::from_name("enter"), Some(KeyCode::Enter));
        assert_eq!(KeyCode::from_name("f11"), Some(KeyCode::F11));
        assert_eq!(KeyCode::from_name("f13"), None);
        assert_eq!(KeyCode::from_name("unknown"), None);
    }

    #[test]
    fn test_codes_follow_device_numbering() {
        assert_eq!(KeyCode::Enter.code(), 66);
        assert_eq!(KeyCode::A.code(), 29);
        assert_eq!(KeyCode::Z.code(), 54);
        assert_eq!(KeyCode::Num0.code(), 7);
        assert_eq!(KeyCode::F12.code(), 142);
        assert_eq!(KeyCode::Backspace.code(), 67);
    }

    #[test]
    fn test_code_round_trip_for_named_keys() {
        for key in KeyCode::NAMED {
            assert_eq!(KeyCode::from_code(key.code()), Some(key));
        }
        assert_eq!(KeyCode::from_code(9999), None);
        assert_eq!(KeyCode::from_code(0), None);
    }

    #[test]
    fn test_every_key_has_a_distinct_code() {
        let all: Vec<KeyCode> = LETTERS
            .into_iter()
            .chain(DIGITS)
            .chain(FUNCTION_KEYS)
            .chain(KeyCode::NAMED)
            .collect();
        for key in &all {
            assert_ne!(key.code(), 0, "{:?}", key);
            assert_eq!(KeyCode::from_code(key.code()), Some(*key));
        }
        let mut codes: Vec<u32> = all.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_meta_state() {
        let mods = Modifier::from_meta_state(META_CTRL_ON | META_SHIFT_ON);
        assert_eq!(mods, vec![Modifier::Control, Modifier::Shift]);
        assert!(Modifier::from_meta_state(0).is_empty());
    }
}
