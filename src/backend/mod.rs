//! Collaborator abstraction
//!
//! The controller never talks to the OS directly. It drives three narrow
//! collaborators: an input injector, a screen capturer and a browser
//! launcher. Default implementations live in [`crate::input`],
//! [`crate::screenshot`] and [`browser`].

mod browser;

pub use browser::SystemBrowser;

use crate::core::ScreenSize;

/// Simulates pointer and keyboard events at the OS level
///
/// Keys are canonical tokens as produced by
/// [`normalize_key`](crate::core::normalize_key).
pub trait InputInjector {
    /// Move the pointer to absolute screen coordinates
    fn move_to(&mut self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Move to coordinates and left-click once
    fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Hold the left button from the current position to the target, then release
    fn drag_to(&mut self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Press and release a single key
    fn press(&mut self, key: &str) -> anyhow::Result<()>;

    /// Press keys in order, then release them in reverse order
    fn hotkey(&mut self, keys: &[&str]) -> anyhow::Result<()>;

    /// Type text verbatim
    fn write(&mut self, text: &str) -> anyhow::Result<()>;

    /// Vertical scroll, positive is up
    fn scroll(&mut self, amount: i32) -> anyhow::Result<()>;

    /// Horizontal scroll, positive is right
    fn hscroll(&mut self, amount: i32) -> anyhow::Result<()>;
}

/// Produces raster snapshots of the display
pub trait ScreenCapturer {
    fn screen_size(&mut self) -> anyhow::Result<ScreenSize>;

    /// Capture the full display as PNG bytes
    fn capture_png(&mut self) -> anyhow::Result<Vec<u8>>;
}

/// Opens a URL with the OS default handler
pub trait BrowserLauncher {
    fn open(&mut self, url: &str) -> anyhow::Result<()>;
}
