//! The `Computer` capability interface
//!
//! Every backend (desktop, headless browser, remote VM, ...) exposes the same
//! action vocabulary. Each action returns an [`EnvState`] captured after the
//! action completes, so a caller can close its perception-action loop without
//! an extra round trip.

use std::ops::{Deref, DerefMut};

use crate::core::{EnvState, ScreenSize, ScrollDirection};
use crate::error::Result;

/// Uniform remote-control contract over a screen, pointer and keyboard
///
/// Coordinates are absolute screen pixels. Implementations do not validate
/// them against [`Computer::screen_size`].
pub trait Computer {
    fn screen_size(&self) -> ScreenSize;

    /// Open the configured initial URL in a browser
    fn open_browser(&mut self) -> Result<EnvState>;

    fn click_at(&mut self, x: i32, y: i32) -> Result<EnvState>;

    fn hover_at(&mut self, x: i32, y: i32) -> Result<EnvState>;

    /// Focus (x, y), optionally clear the field, type `text`, optionally press Enter
    fn type_text_at(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_before_typing: bool,
    ) -> Result<EnvState>;

    /// Scroll the focused document without moving the pointer
    fn scroll_document(&mut self, direction: ScrollDirection) -> Result<EnvState>;

    /// Move the pointer to (x, y) and scroll by `magnitude`
    fn scroll_at(
        &mut self,
        x: i32,
        y: i32,
        direction: ScrollDirection,
        magnitude: i32,
    ) -> Result<EnvState>;

    fn wait_5_seconds(&mut self) -> Result<EnvState>;

    fn go_back(&mut self) -> Result<EnvState>;

    fn go_forward(&mut self) -> Result<EnvState>;

    /// Navigate to the configured search engine
    fn search(&mut self) -> Result<EnvState>;

    fn navigate(&mut self, url: &str) -> Result<EnvState>;

    /// Press a single key, or several keys as one chord
    fn key_combination(&mut self, keys: &[String]) -> Result<EnvState>;

    fn drag_and_drop(
        &mut self,
        x: i32,
        y: i32,
        destination_x: i32,
        destination_y: i32,
    ) -> Result<EnvState>;

    /// Capture state without acting
    fn current_state(&mut self) -> Result<EnvState>;

    /// Claim backend resources before a session
    fn acquire(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release whatever [`Computer::acquire`] claimed
    fn release(&mut self) {}

    /// Acquire the computer for the lifetime of the returned guard
    fn session(&mut self) -> Result<Session<'_, Self>>
    where
        Self: Sized,
    {
        Session::new(self)
    }
}

/// Scoped use of a [`Computer`]; releases it on drop
pub struct Session<'a, C: Computer + ?Sized> {
    computer: &'a mut C,
}

impl<'a, C: Computer + ?Sized> Session<'a, C> {
    pub fn new(computer: &'a mut C) -> Result<Self> {
        computer.acquire()?;
        Ok(Self { computer })
    }
}

impl<C: Computer + ?Sized> Deref for Session<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.computer
    }
}

impl<C: Computer + ?Sized> DerefMut for Session<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.computer
    }
}

impl<C: Computer + ?Sized> Drop for Session<'_, C> {
    fn drop(&mut self) {
        self.computer.release();
    }
}
