//! Screenshot capture handed off to an embedder-supplied image sink.

use crate::error::PolyviewError;

/// Raw screenshot pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    /// `width * height * channels` bytes.
    pub pixels: Vec<u8>,
}

impl ScreenshotImage {
    /// Build from RGBA8 rows, dropping alpha unless `keep_alpha`.
    #[must_use]
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        keep_alpha: bool,
    ) -> Self {
        if keep_alpha {
            return Self {
                width,
                height,
                channels: 4,
                pixels: rgba,
            };
        }
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self {
            width,
            height,
            channels: 3,
            pixels,
        }
    }
}

/// Encodes and stores screenshots. Image formats are the sink's concern.
pub trait ImageSink {
    /// Store `image` under `name`.
    ///
    /// # Errors
    ///
    /// Whatever the sink reports; typically [`PolyviewError::Io`].
    fn write_image(
        &mut self,
        name: &str,
        image: &ScreenshotImage,
    ) -> Result<(), PolyviewError>;
}

/// Default name of the `index`th automatic screenshot.
#[must_use]
pub fn screenshot_name(index: u32) -> String {
    format!("screenshot_{index:06}.png")
}
