//! Desktop input connection using enigo
//!
//! Synthetic keyboard input has no view of the focused field's content, so
//! selection changes and surrounding-text reads are reported as not applied.

use anyhow::Result;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::device::keys::{KeyCode, Modifier};
use crate::device::session::{InputConnection, InputSession};
use crate::device::types::{ContextMenuAction, KeyAction, KeyEvent, SurroundingText};

/// Input controller for keyboard simulation
struct InputController {
    enigo: Enigo,
}

impl InputController {
    fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("Failed to create input controller: {:?}", e))?;
        Ok(Self { enigo })
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.enigo
            .text(text)
            .map_err(|e| anyhow::anyhow!("Failed to type text: {:?}", e))
    }

    fn key(&mut self, key: KeyCode, direction: Direction) -> Result<()> {
        let Some(k) = to_enigo(key) else {
            anyhow::bail!("Key {:?} has no desktop equivalent", key);
        };
        self.enigo
            .key(k, direction)
            .map_err(|e| anyhow::anyhow!("Failed to send key {:?}: {:?}", key, e))
    }

    fn repeat(&mut self, key: KeyCode, times: u32) -> Result<()> {
        for _ in 0..times {
            self.key(key, Direction::Click)?;
        }
        Ok(())
    }

    /// Execute a hotkey combination (e.g., Ctrl+C, Alt+Tab)
    fn hotkey(&mut self, modifiers: &[Modifier], key: KeyCode) -> Result<()> {
        for modifier in modifiers {
            self.key(modifier.key_code(), Direction::Press)?;
        }

        thread::sleep(Duration::from_millis(20));
        let pressed = self.key(key, Direction::Click);
        thread::sleep(Duration::from_millis(20));

        // Release even if the main key failed so no modifier stays stuck
        for modifier in modifiers.iter().rev() {
            self.key(modifier.key_code(), Direction::Release)?;
        }
        pressed
    }
}

fn to_enigo(key: KeyCode) -> Option<Key> {
    let k = match key {
        KeyCode::A => Key::Unicode('a'),
        KeyCode::B => Key::Unicode('b'),
        KeyCode::C => Key::Unicode('c'),
        KeyCode::D => Key::Unicode('d'),
        KeyCode::E => Key::Unicode('e'),
        KeyCode::F => Key::Unicode('f'),
        KeyCode::G => Key::Unicode('g'),
        KeyCode::H => Key::Unicode('h'),
        KeyCode::I => Key::Unicode('i'),
        KeyCode::J => Key::Unicode('j'),
        KeyCode::K => Key::Unicode('k'),
        KeyCode::L => Key::Unicode('l'),
        KeyCode::M => Key::Unicode('m'),
        KeyCode::N => Key::Unicode('n'),
        KeyCode::O => Key::Unicode('o'),
        KeyCode::P => Key::Unicode('p'),
        KeyCode::Q => Key::Unicode('q'),
        KeyCode::R => Key::Unicode('r'),
        KeyCode::S => Key::Unicode('s'),
        KeyCode::T => Key::Unicode('t'),
        KeyCode::U => Key::Unicode('u'),
        KeyCode::V => Key::Unicode('v'),
        KeyCode::W => Key::Unicode('w'),
        KeyCode::X => Key::Unicode('x'),
        KeyCode::Y => Key::Unicode('y'),
        KeyCode::Z => Key::Unicode('z'),

        KeyCode::Num0 => Key::Unicode('0'),
        KeyCode::Num1 => Key::Unicode('1'),
        KeyCode::Num2 => Key::Unicode('2'),
        KeyCode::Num3 => Key::Unicode('3'),
        KeyCode::Num4 => Key::Unicode('4'),
        KeyCode::Num5 => Key::Unicode('5'),
        KeyCode::Num6 => Key::Unicode('6'),
        KeyCode::Num7 => Key::Unicode('7'),
        KeyCode::Num8 => Key::Unicode('8'),
        KeyCode::Num9 => Key::Unicode('9'),

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        KeyCode::Control => Key::Control,
        KeyCode::Alt => Key::Alt,
        KeyCode::Shift => Key::Shift,
        KeyCode::Meta => Key::Meta,

        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Return,
        KeyCode::Tab => Key::Tab,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::PrintScreen => Key::Print,
        KeyCode::ScrollLock => Key::Other(0x91), // VK_SCROLL on Windows
        KeyCode::Pause => Key::Pause,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::NumLock => Key::Numlock,

        KeyCode::Back | KeyCode::HomeScreen => return None,
    };
    Some(k)
}

/// Primary shortcut modifier: Cmd on macOS, Ctrl elsewhere.
fn shortcut_modifier() -> Modifier {
    if cfg!(target_os = "macos") {
        Modifier::Meta
    } else {
        Modifier::Control
    }
}

fn context_menu_shortcut(action: ContextMenuAction) -> (Vec<Modifier>, KeyCode) {
    let primary = shortcut_modifier();
    match action {
        ContextMenuAction::SelectAll => (vec![primary], KeyCode::A),
        ContextMenuAction::Cut => (vec![primary], KeyCode::X),
        ContextMenuAction::Copy => (vec![primary], KeyCode::C),
        ContextMenuAction::Paste => (vec![primary], KeyCode::V),
        ContextMenuAction::PasteAsPlainText => (vec![primary, Modifier::Shift], KeyCode::V),
        ContextMenuAction::Undo => (vec![primary], KeyCode::Z),
        ContextMenuAction::Redo if cfg!(target_os = "macos") => {
            (vec![primary, Modifier::Shift], KeyCode::Z)
        }
        ContextMenuAction::Redo => (vec![primary], KeyCode::Y),
    }
}

/// Connection to whatever currently has keyboard focus on the desktop.
pub struct DesktopConnection;

impl InputConnection for DesktopConnection {
    fn accepts_text(&self) -> bool {
        true
    }

    fn commit_text(&self, text: &str, _new_cursor_position: i32) -> Result<bool> {
        InputController::new()?.type_text(text)?;
        Ok(true)
    }

    fn set_selection(&self, _start: u32, _end: u32) -> Result<bool> {
        Ok(false)
    }

    fn surrounding_text(&self, _before: u32, _after: u32) -> Result<Option<SurroundingText>> {
        Ok(None)
    }

    fn send_key_event(&self, event: &KeyEvent) -> Result<bool> {
        let Some(key) = KeyCode::from_code(event.key_code) else {
            tracing::debug!("Key code {} has no desktop mapping", event.key_code);
            return Ok(false);
        };
        if to_enigo(key).is_none() {
            tracing::debug!("Key {:?} has no desktop equivalent", key);
            return Ok(false);
        }

        let mut input = InputController::new()?;
        let modifiers = Modifier::from_meta_state(event.meta_state);
        match event.action {
            KeyAction::Press if !modifiers.is_empty() => input.hotkey(&modifiers, key)?,
            KeyAction::Press => input.key(key, Direction::Click)?,
            KeyAction::Down => input.key(key, Direction::Press)?,
            KeyAction::Up => input.key(key, Direction::Release)?,
        }
        Ok(true)
    }

    fn delete_surrounding_text(&self, before_length: u32, after_length: u32) -> Result<bool> {
        let mut input = InputController::new()?;
        input.repeat(KeyCode::Backspace, before_length)?;
        input.repeat(KeyCode::Delete, after_length)?;
        Ok(true)
    }

    fn perform_context_menu_action(&self, action: ContextMenuAction) -> Result<bool> {
        let (modifiers, key) = context_menu_shortcut(action);
        InputController::new()?.hotkey(&modifiers, key)?;
        Ok(true)
    }
}

/// Desktop input session: always started, one shared connection.
pub struct DesktopInput {
    connection: Arc<DesktopConnection>,
}

impl DesktopInput {
    pub fn new() -> Self {
        Self {
            connection: Arc::new(DesktopConnection),
        }
    }
}

impl Default for DesktopInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSession for DesktopInput {
    fn input_started(&self) -> bool {
        true
    }

    fn connection(&self) -> Option<Arc<dyn InputConnection>> {
        Some(self.connection.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_navigation_keys_have_no_desktop_mapping() {
        assert!(to_enigo(KeyCode::Back).is_none());
        assert!(to_enigo(KeyCode::HomeScreen).is_none());
        assert!(to_enigo(KeyCode::Enter).is_some());
    }

    #[test]
    fn test_context_menu_shortcuts() {
        let (mods, key) = context_menu_shortcut(ContextMenuAction::PasteAsPlainText);
        assert_eq!(mods.len(), 2);
        assert_eq!(key, KeyCode::V);
        let (mods, key) = context_menu_shortcut(ContextMenuAction::SelectAll);
        assert_eq!(mods, vec![shortcut_modifier()]);
        assert_eq!(key, KeyCode::A);
    }
}
