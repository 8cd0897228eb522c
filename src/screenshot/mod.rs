//! Screenshot capture using xcap
//!
//! This module captures the primary display with the xcap crate, which
//! handles X11, Wayland (via portal), macOS and Windows transparently.

use image::{ImageEncoder, RgbaImage};
use xcap::Monitor;

use crate::backend::ScreenCapturer;
use crate::core::ScreenSize;

/// Screen capturer for the primary monitor
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapturer;

impl XcapCapturer {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenCapturer for XcapCapturer {
    fn screen_size(&mut self) -> anyhow::Result<ScreenSize> {
        let monitor = primary_monitor()?;
        Ok(ScreenSize::new(monitor.width()?, monitor.height()?))
    }

    fn capture_png(&mut self) -> anyhow::Result<Vec<u8>> {
        let image = primary_monitor()?.capture_image()?;
        tracing::debug!("Captured {}x{} screenshot", image.width(), image.height());
        encode_png(&image)
    }
}

/// Primary monitor, or the first one if none is flagged primary
fn primary_monitor() -> anyhow::Result<Monitor> {
    let monitors = Monitor::all()?;

    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        if fallback.is_none() {
            fallback = Some(monitor);
        }
    }

    fallback.ok_or_else(|| anyhow::anyhow!("No monitors found"))
}

/// Encode an RGBA image as PNG
pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png() {
        let image = RgbaImage::from_pixel(4, 3, image::Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&image).unwrap();

        assert!(bytes.starts_with(&PNG_SIGNATURE));

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn test_capture_primary_screen() {
        // This test may fail in CI environments without displays
        let mut capturer = XcapCapturer::new();
        if let Ok(size) = capturer.screen_size() {
            assert!(size.width > 0 && size.height > 0);
        }
    }
}
