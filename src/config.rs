//! Controller configuration

use std::env;

use crate::core::ScreenSize;

pub const DEFAULT_URL: &str = "https://www.google.com";

/// The three construction parameters shared by every computer backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Accepted for uniformity with other backends; the desktop queries the real size
    pub screen_size_hint: Option<ScreenSize>,
    /// Opened by `open_browser`
    pub initial_url: String,
    /// Target of `search`
    pub search_engine_url: String,
}

impl ControllerConfig {
    pub fn new(initial_url: impl Into<String>, search_engine_url: impl Into<String>) -> Self {
        Self {
            screen_size_hint: None,
            initial_url: initial_url.into(),
            search_engine_url: search_engine_url.into(),
        }
    }

    /// Read overrides from `DESKPILOT_*` variables
    ///
    /// Only the server binary calls this; the controller never reads the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let width = env::var("DESKPILOT_SCREEN_WIDTH").ok().and_then(|w| w.parse().ok());
        let height = env::var("DESKPILOT_SCREEN_HEIGHT").ok().and_then(|h| h.parse().ok());

        Self {
            screen_size_hint: width.zip(height).map(ScreenSize::from),
            initial_url: env::var("DESKPILOT_INITIAL_URL").unwrap_or(defaults.initial_url),
            search_engine_url: env::var("DESKPILOT_SEARCH_ENGINE_URL")
                .unwrap_or(defaults.search_engine_url),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL, DEFAULT_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.initial_url, "https://www.google.com");
        assert_eq!(config.search_engine_url, "https://www.google.com");
        assert_eq!(config.screen_size_hint, None);
    }
}
