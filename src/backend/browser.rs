//! Browser launcher backed by the OS default URL handler

use super::BrowserLauncher;

/// Launches URLs via the `webbrowser` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&mut self, url: &str) -> anyhow::Result<()> {
        tracing::debug!("Opening {} in system browser", url);
        webbrowser::open(url)?;
        Ok(())
    }
}
