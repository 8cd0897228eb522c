//! Desktop controller
//!
//! Drives the local desktop through OS-level input injection: the same way a
//! human would, by pixel coordinates, key names and screenshots. Browser
//! navigation is done through keyboard shortcuts in whatever browser window
//! has focus.

use std::thread;
use std::time::Duration;

use crate::backend::{BrowserLauncher, InputInjector, ScreenCapturer, SystemBrowser};
use crate::computer::Computer;
use crate::config::ControllerConfig;
use crate::core::{
    EnvState, KeyBindings, Platform, ScreenSize, ScrollDelta, ScrollDirection, normalize_key,
};
use crate::error::Result;
use crate::input::EnigoInjector;
use crate::screenshot::XcapCapturer;

/// Fixed waits inserted after actions that trigger asynchronous redraws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// After `open_browser` and `navigate`
    pub settle: Duration,
    /// After the OS application launcher is opened
    pub launcher_settle: Duration,
    /// Length of `wait_5_seconds`
    pub wait: Duration,
}

impl Timings {
    /// No waits at all
    pub const fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            launcher_settle: Duration::ZERO,
            wait: Duration::ZERO,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            launcher_settle: Duration::from_millis(200),
            wait: Duration::from_secs(5),
        }
    }
}

/// Prefix `https://` unless the URL already names an http(s) scheme
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// [`Computer`] backed by the local mouse, keyboard and screen
///
/// Not safe for concurrent use: the controller assumes one caller issuing
/// actions serially. Interleaved actions would interleave at the OS input
/// level. The type is neither `Send` nor `Sync`, so sharing it requires an
/// owner thread such as [`ComputerWorker`](crate::worker::ComputerWorker).
///
/// `current_url` is tracked, not observed: only `navigate`, `search` and
/// `open_browser` update it. Clicking a link, `go_back` or `go_forward` can
/// change the real page without the tracked URL following.
pub struct DesktopController {
    input: Box<dyn InputInjector>,
    screen: Box<dyn ScreenCapturer>,
    browser: Box<dyn BrowserLauncher>,
    bindings: &'static KeyBindings,
    timings: Timings,
    /// Queried once at construction, never refreshed
    screen_size: ScreenSize,
    initial_url: String,
    search_engine_url: String,
    current_url: String,
    /// Set when the OS launcher was opened; the next `type_text_at` then
    /// types into the launcher instead of clicking first
    launcher_pending: bool,
}

impl DesktopController {
    /// Create a controller over the local desktop
    ///
    /// `screen_size_hint` is accepted for uniformity with other backends; the
    /// real size of the primary display is used.
    pub fn new(
        screen_size_hint: Option<ScreenSize>,
        initial_url: impl Into<String>,
        search_engine_url: impl Into<String>,
    ) -> Result<Self> {
        let config = ControllerConfig {
            screen_size_hint,
            initial_url: initial_url.into(),
            search_engine_url: search_engine_url.into(),
        };
        Self::from_config(config)
    }

    /// Create a controller over the local desktop with the default backends
    pub fn from_config(config: ControllerConfig) -> Result<Self> {
        let input = EnigoInjector::new()?;
        Self::with_backends(
            config,
            Platform::current(),
            Box::new(input),
            Box::new(XcapCapturer::new()),
            Box::new(SystemBrowser),
        )
    }

    /// Create a controller over arbitrary collaborators
    pub fn with_backends(
        config: ControllerConfig,
        platform: Platform,
        input: Box<dyn InputInjector>,
        mut screen: Box<dyn ScreenCapturer>,
        browser: Box<dyn BrowserLauncher>,
    ) -> Result<Self> {
        let screen_size = screen.screen_size()?;

        if let Some(hint) = config.screen_size_hint.filter(|hint| *hint != screen_size) {
            tracing::debug!(
                "Ignoring screen size hint {}x{}, display is {}x{}",
                hint.width,
                hint.height,
                screen_size.width,
                screen_size.height
            );
        }

        tracing::info!(
            "Desktop controller ready ({:?}, {}x{})",
            platform,
            screen_size.width,
            screen_size.height
        );

        Ok(Self {
            input,
            screen,
            browser,
            bindings: platform.bindings(),
            timings: Timings::default(),
            screen_size,
            initial_url: config.initial_url,
            search_engine_url: config.search_engine_url,
            current_url: String::new(),
            launcher_pending: false,
        })
    }

    /// Replace the settle delays
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// URL the controller believes is loaded
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Whether the next `type_text_at` will skip its click
    pub fn launcher_pending(&self) -> bool {
        self.launcher_pending
    }

    fn settle(duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<()> {
        match direction.delta(amount) {
            ScrollDelta::Vertical(amount) => self.input.scroll(amount)?,
            ScrollDelta::Horizontal(amount) => self.input.hscroll(amount)?,
        }
        Ok(())
    }
}

impl Computer for DesktopController {
    fn screen_size(&self) -> ScreenSize {
        self.screen_size
    }

    fn open_browser(&mut self) -> Result<EnvState> {
        tracing::debug!("Opening browser at {}", self.initial_url);
        self.browser.open(&self.initial_url)?;
        Self::settle(self.timings.settle);
        self.current_url = self.initial_url.clone();
        self.current_state()
    }

    fn click_at(&mut self, x: i32, y: i32) -> Result<EnvState> {
        self.input.click(x, y)?;
        self.current_state()
    }

    fn hover_at(&mut self, x: i32, y: i32) -> Result<EnvState> {
        self.input.move_to(x, y)?;
        self.current_state()
    }

    fn type_text_at(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_before_typing: bool,
    ) -> Result<EnvState> {
        if self.launcher_pending {
            // The launcher already holds keyboard focus and has nothing to click
            self.launcher_pending = false;
        } else {
            self.input.click(x, y)?;
        }

        if clear_before_typing {
            self.input.hotkey(self.bindings.select_all)?;
            self.input.press("backspace")?;
        }

        self.input.write(text)?;

        if press_enter {
            self.input.press("enter")?;
        }

        self.current_state()
    }

    fn scroll_document(&mut self, direction: ScrollDirection) -> Result<EnvState> {
        let amount = (self.screen_size.height / 2) as i32;
        self.scroll(direction, amount)?;
        self.current_state()
    }

    fn scroll_at(
        &mut self,
        x: i32,
        y: i32,
        direction: ScrollDirection,
        magnitude: i32,
    ) -> Result<EnvState> {
        self.input.move_to(x, y)?;
        self.scroll(direction, magnitude)?;
        self.current_state()
    }

    fn wait_5_seconds(&mut self) -> Result<EnvState> {
        Self::settle(self.timings.wait);
        self.current_state()
    }

    fn go_back(&mut self) -> Result<EnvState> {
        self.input.hotkey(self.bindings.history_back)?;
        self.current_state()
    }

    fn go_forward(&mut self) -> Result<EnvState> {
        self.input.hotkey(self.bindings.history_forward)?;
        self.current_state()
    }

    fn search(&mut self) -> Result<EnvState> {
        let url = self.search_engine_url.clone();
        self.navigate(&url)
    }

    fn navigate(&mut self, url: &str) -> Result<EnvState> {
        let url = normalize_url(url);
        tracing::debug!("Navigating to {}", url);

        self.input.hotkey(self.bindings.focus_address_bar)?;
        self.input.write(&url)?;
        self.input.press("enter")?;
        self.current_url = url;
        Self::settle(self.timings.settle);

        self.current_state()
    }

    fn key_combination(&mut self, keys: &[String]) -> Result<EnvState> {
        let keys: Vec<String> = keys
            .iter()
            .map(|key| normalize_key(key, self.bindings))
            .collect();

        match keys.as_slice() {
            [] => {}
            [key] => self.input.press(key)?,
            _ => {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                self.input.hotkey(&keys)?;
            }
        }

        if self.bindings.is_app_launcher(keys.as_slice()) {
            tracing::debug!("Application launcher opened; next type_text_at skips its click");
            self.launcher_pending = true;
            Self::settle(self.timings.launcher_settle);
        }

        self.current_state()
    }

    fn drag_and_drop(
        &mut self,
        x: i32,
        y: i32,
        destination_x: i32,
        destination_y: i32,
    ) -> Result<EnvState> {
        self.input.move_to(x, y)?;
        self.input.drag_to(destination_x, destination_y)?;
        self.current_state()
    }

    fn current_state(&mut self) -> Result<EnvState> {
        let screenshot = self.screen.capture_png()?;
        Ok(EnvState::new(screenshot, self.current_url.clone()))
    }
}
