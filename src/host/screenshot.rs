//! Scene screenshots written through the configured image sink.

use super::Host;
use crate::backend::PassTarget;
use crate::error::PolyviewError;
use crate::screenshot::{screenshot_name, ScreenshotImage};

impl Host {
    /// Capture the scene (no UI) to `screenshot_NNNNNN.png`, numbering
    /// captures from zero.
    ///
    /// # Errors
    ///
    /// See [`Self::screenshot_to`]. The index only advances on success.
    pub fn screenshot(
        &mut self,
        transparent_bg: bool,
    ) -> Result<(), PolyviewError> {
        let name = screenshot_name(self.screenshot_index);
        self.screenshot_to(&name, transparent_bg)?;
        self.screenshot_index += 1;
        Ok(())
    }

    /// Capture the scene (no UI) and hand it to the image sink as `name`.
    /// Alpha is kept only with `transparent_bg`, in which case the
    /// background clears to fully transparent.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NoImageSink`] without a sink,
    /// [`PolyviewError::NotInitialized`] without a backend, or whatever
    /// the readback or the sink reports.
    pub fn screenshot_to(
        &mut self,
        name: &str,
        transparent_bg: bool,
    ) -> Result<(), PolyviewError> {
        let result = self.capture_to(name, transparent_bg);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn capture_to(
        &mut self,
        name: &str,
        transparent_bg: bool,
    ) -> Result<(), PolyviewError> {
        let Some(sink) = self.image_sink.as_deref_mut() else {
            return Err(PolyviewError::NoImageSink);
        };
        let Some(backend) = self.backend.as_deref_mut() else {
            return Err(PolyviewError::NotInitialized);
        };

        let [r, g, b, _] = self.options.frame.background_color;
        let clear = [r, g, b, if transparent_bg { 0.0 } else { 1.0 }];
        let view = self.camera.view_params(self.framebuffer_size);
        let registry = &mut self.registry;
        backend.render(PassTarget::Scene { clear }, &view, &mut |dc| {
            for (_, structure) in registry.iter_mut() {
                structure.draw(dc);
            }
        });
        let (width, height, rgba) = backend.read_scene_pixels()?;
        // The next presented frame must use the configured background.
        self.scheduler.request_redraw();

        let image =
            ScreenshotImage::from_rgba(width, height, rgba, transparent_bg);
        sink.write_image(name, &image)?;
        log::debug!(
            "{}saved screenshot {name} ({width}x{height})",
            self.options.print_prefix
        );
        Ok(())
    }
}
