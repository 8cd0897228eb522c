//! State snapshots returned after every action

use serde::Serialize;

/// Size of the controlled display in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for ScreenSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Screenshot plus the URL the controller believes is loaded
///
/// The screenshot is PNG-encoded. Its dimensions can differ from
/// [`ScreenSize`] on displays with scaling enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvState {
    screenshot: Vec<u8>,
    url: String,
}

impl EnvState {
    pub fn new(screenshot: Vec<u8>, url: impl Into<String>) -> Self {
        Self {
            screenshot,
            url: url.into(),
        }
    }

    /// PNG bytes of the full display
    pub fn screenshot(&self) -> &[u8] {
        &self.screenshot
    }

    /// Self-tracked URL, not read back from the browser
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.screenshot, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_size_from_tuple() {
        assert_eq!(ScreenSize::from((1920, 1080)), ScreenSize::new(1920, 1080));
    }

    #[test]
    fn test_env_state_parts() {
        let state = EnvState::new(vec![1, 2, 3], "https://example.com");
        assert_eq!(state.screenshot(), &[1, 2, 3]);
        assert_eq!(state.url(), "https://example.com");

        let (bytes, url) = state.into_parts();
        assert_eq!(bytes.len(), 3);
        assert_eq!(url, "https://example.com");
    }
}
