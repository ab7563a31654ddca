//! Primary-monitor capture using xcap, encoded as JPEG

use anyhow::Result;
use image::{DynamicImage, ImageEncoder, RgbaImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use xcap::Monitor;

use crate::device::session::CaptureSession;
use crate::device::types::CaptureResult;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Capture the entire primary monitor
pub(crate) fn capture_primary_screen() -> Result<RgbaImage> {
    let primary = primary_monitor()?;
    primary
        .capture_image()
        .map_err(|e| anyhow::anyhow!("Failed to capture screen: {}", e))
}

pub(crate) fn primary_monitor() -> Result<Monitor> {
    let monitors = Monitor::all().map_err(|e| anyhow::anyhow!("Failed to get monitors: {}", e))?;

    monitors
        .into_iter()
        .find(|m| m.is_primary())
        .ok_or_else(|| anyhow::anyhow!("No primary monitor found"))
}

/// Encode an RGBA frame as JPEG. Alpha is dropped.
pub fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();

    let mut buffer = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| anyhow::anyhow!("Failed to encode JPEG: {}", e))?;

    Ok(buffer.into_inner())
}

/// Screen-capture session over the primary monitor.
///
/// Starts active; the host can pause it with [`DesktopCapture::set_active`].
pub struct DesktopCapture {
    active: AtomicBool,
    quality: u8,
}

impl DesktopCapture {
    pub fn new(quality: u8) -> Self {
        Self {
            active: AtomicBool::new(true),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl Default for DesktopCapture {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl CaptureSession for DesktopCapture {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn capture(&self) -> Result<Option<CaptureResult>> {
        let frame = capture_primary_screen()?;
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let data = encode_jpeg(frame, self.quality)?;
        tracing::debug!("Captured {}x{} frame ({} bytes)", width, height, data.len());
        Ok(Some(CaptureResult {
            data,
            width,
            height,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_produces_jpeg_magic() {
        let frame = RgbaImage::from_pixel(8, 4, image::Rgba([200, 10, 10, 255]));
        let bytes = encode_jpeg(frame, 75).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_capture_toggle() {
        let capture = DesktopCapture::new(0);
        assert_eq!(capture.quality, 1);
        assert!(capture.is_active());
        capture.set_active(false);
        assert!(!capture.is_active());
    }
}
