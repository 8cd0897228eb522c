//! Input simulation via enigo
//!
//! This module injects mouse and keyboard events through the enigo crate,
//! which talks to the native input APIs on macOS, Windows and X11/libei.

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use std::thread;
use std::time::Duration;

use crate::backend::InputInjector;

/// Pause between the primitive events that make up a click or drag
const STEP_DELAY: Duration = Duration::from_millis(20);

/// Input injector backed by an enigo connection
pub struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    /// Open a connection to the platform input system
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("Failed to create input controller: {:?}", e))?;
        Ok(Self { enigo })
    }

    fn button(&mut self, direction: Direction) -> anyhow::Result<()> {
        self.enigo
            .button(Button::Left, direction)
            .map_err(|e| anyhow::anyhow!("Mouse button {:?} failed: {:?}", direction, e))
    }

    fn key(&mut self, key: Key, direction: Direction) -> anyhow::Result<()> {
        self.enigo
            .key(key, direction)
            .map_err(|e| anyhow::anyhow!("Key {:?} {:?} failed: {:?}", key, direction, e))
    }

    /// Resolve tokens to keys, skipping anything the backend cannot press
    fn resolve(keys: &[&str]) -> Vec<Key> {
        keys.iter()
            .filter_map(|token| {
                let key = map_token_to_key(token);
                if key.is_none() {
                    tracing::warn!("Skipping unsupported key: {}", token);
                }
                key
            })
            .collect()
    }
}

impl InputInjector for EnigoInjector {
    fn move_to(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        tracing::debug!("Moving pointer to ({}, {})", x, y);
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| anyhow::anyhow!("Failed to move mouse: {:?}", e))
    }

    fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        self.move_to(x, y)?;
        thread::sleep(STEP_DELAY);
        self.button(Direction::Click)
    }

    fn drag_to(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        tracing::debug!("Dragging to ({}, {})", x, y);
        self.button(Direction::Press)?;
        thread::sleep(STEP_DELAY);
        let moved = self.move_to(x, y);
        thread::sleep(STEP_DELAY);
        // Release even if the move failed, so the button is not left held down
        self.button(Direction::Release)?;
        moved
    }

    fn press(&mut self, key: &str) -> anyhow::Result<()> {
        tracing::debug!("Pressing key: {}", key);
        match map_token_to_key(key) {
            Some(key) => self.key(key, Direction::Click),
            None => {
                tracing::warn!("Skipping unsupported key: {}", key);
                Ok(())
            }
        }
    }

    fn hotkey(&mut self, keys: &[&str]) -> anyhow::Result<()> {
        tracing::debug!("Executing hotkey: {:?}", keys);
        let keys = Self::resolve(keys);
        press_chord(&keys, |key, direction| self.key(key, direction))
    }

    fn write(&mut self, text: &str) -> anyhow::Result<()> {
        tracing::debug!("Typing {} characters", text.chars().count());
        if text.is_empty() {
            return Ok(());
        }
        self.enigo
            .text(text)
            .map_err(|e| anyhow::anyhow!("Failed to type text: {:?}", e))
    }

    fn scroll(&mut self, amount: i32) -> anyhow::Result<()> {
        tracing::debug!("Scrolling vertically by {}", amount);
        // enigo scrolls down for positive lengths
        self.enigo
            .scroll(amount.saturating_neg(), Axis::Vertical)
            .map_err(|e| anyhow::anyhow!("Failed to scroll vertical: {:?}", e))
    }

    fn hscroll(&mut self, amount: i32) -> anyhow::Result<()> {
        tracing::debug!("Scrolling horizontally by {}", amount);
        self.enigo
            .scroll(amount, Axis::Horizontal)
            .map_err(|e| anyhow::anyhow!("Failed to scroll horizontal: {:?}", e))
    }
}

/// Press `keys` in order, then release the pressed ones in reverse
///
/// Every key that went down is released, even after a failed press or
/// release. The first error is returned.
fn press_chord<K: Copy>(
    keys: &[K],
    mut key: impl FnMut(K, Direction) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut pressed = Vec::with_capacity(keys.len());
    let mut result = Ok(());
    for k in keys {
        if let Err(e) = key(*k, Direction::Press) {
            result = Err(e);
            break;
        }
        pressed.push(*k);
    }

    thread::sleep(STEP_DELAY);

    for k in pressed.into_iter().rev() {
        let released = key(k, Direction::Release);
        if result.is_ok() {
            result = released;
        }
    }

    result
}

/// Map a canonical key token to an enigo key
fn map_token_to_key(token: &str) -> Option<Key> {
    let key = match token {
        // Modifiers
        "ctrl" => Key::Control,
        "alt" => Key::Alt,
        "shift" => Key::Shift,
        "command" | "win" | "super" => Key::Meta,

        // Special keys
        "enter" => Key::Return,
        "esc" => Key::Escape,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "capslock" => Key::CapsLock,

        // Arrow keys
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,

        // Function keys
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "f13" => Key::F13,
        "f14" => Key::F14,
        "f15" => Key::F15,
        "f16" => Key::F16,
        "f17" => Key::F17,
        "f18" => Key::F18,
        "f19" => Key::F19,
        "f20" => Key::F20,

        // Not available on macOS keyboards
        #[cfg(not(target_os = "macos"))]
        "insert" => Key::Insert,
        #[cfg(not(target_os = "macos"))]
        "printscreen" | "prtsc" => Key::Print,
        #[cfg(not(target_os = "macos"))]
        "numlock" => Key::Numlock,

        // Single printable characters
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Unicode(c),
                _ => return None,
            }
        }
    };

    Some(key)
}
