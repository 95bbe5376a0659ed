mod frame;
mod gui;
mod modal;
mod picking;
mod registration;
mod screenshot;
#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use crate::backend::{Platform, RenderBackend};
use crate::camera::CameraController;
use crate::error::PolyviewError;
use crate::input::InputProcessor;
use crate::options::Options;
use crate::picking::{PickMap, PickState};
use crate::prefs::{Preferences, PREFS_FILE};
use crate::screenshot::ImageSink;
use crate::structure::{GlobalExtents, StructureRegistry};
use crate::ui::{ContextStack, UiCallback, WarningQueue};
use crate::util::FrameScheduler;

/// The viewer host: owns every structure, the pick state, the modal UI
/// stack, the frame scheduler, and the collaborators that draw to screen.
///
/// One host drives one window. All mutation goes through `&mut self`; UI
/// callbacks receive `&mut Host` and may register or remove structures and
/// push or pop modal contexts.
pub struct Host {
    options: Options,
    registry: StructureRegistry,
    extents: GlobalExtents,
    pick_map: PickMap,
    pick: PickState,
    contexts: ContextStack,
    scheduler: FrameScheduler,
    camera: CameraController,
    input: InputProcessor,
    warnings: WarningQueue,
    user_callback: Option<UiCallback>,
    platform: Option<Box<dyn Platform>>,
    backend: Option<Box<dyn RenderBackend>>,
    image_sink: Option<Box<dyn ImageSink>>,
    prefs: Preferences,
    /// Last polled window size, in points.
    window_size: (u32, u32),
    /// Last polled framebuffer size, in pixels.
    framebuffer_size: (u32, u32),
    screenshot_index: u32,
    initialized: bool,
}

impl Host {
    /// Build a host with no collaborators. Nothing touches the window
    /// system or GPU until [`Self::init`].
    #[must_use]
    pub fn new(options: Options) -> Self {
        let scheduler = FrameScheduler::new(options.frame.max_fps);
        let camera = CameraController::new(&options.camera, 1.0);
        let mut registry = StructureRegistry::new();
        for type_name in &options.default_structure_types {
            registry.declare_type(type_name);
        }
        Self {
            registry,
            extents: GlobalExtents::default(),
            pick_map: PickMap::new(),
            pick: PickState::default(),
            contexts: ContextStack::default(),
            scheduler,
            camera,
            input: InputProcessor::new(),
            warnings: WarningQueue::default(),
            user_callback: None,
            platform: None,
            backend: None,
            image_sink: None,
            prefs: Preferences::default(),
            window_size: (0, 0),
            framebuffer_size: (0, 0),
            screenshot_index: 0,
            initialized: false,
            options,
        }
    }

    /// Install the window platform and render backend and load
    /// preferences.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::AlreadyInitialized`] on a second call; the
    /// collaborators passed in are dropped and the running ones kept.
    pub fn init(
        &mut self,
        platform: Box<dyn Platform>,
        backend: Box<dyn RenderBackend>,
    ) -> Result<(), PolyviewError> {
        if self.initialized {
            let err = PolyviewError::AlreadyInitialized;
            self.report(&err);
            return Err(err);
        }
        if self.options.use_prefs_file {
            self.prefs = Preferences::load_or_default(Path::new(PREFS_FILE));
        }
        self.platform = Some(platform);
        self.backend = Some(backend);
        self.initialized = true;
        self.poll_sizes();
        self.camera.reset_to_default(&self.extents);
        log::debug!(
            "{}initialized ({}x{} framebuffer)",
            self.options.print_prefix,
            self.framebuffer_size.0,
            self.framebuffer_size.1
        );
        Ok(())
    }

    /// Whether [`Self::init`] has run and [`Self::shutdown`] has not.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reset the camera to the scene and run the main loop until the
    /// platform reports that the window should close.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NotInitialized`] before [`Self::init`].
    pub fn show(&mut self) -> Result<(), PolyviewError> {
        if !self.initialized {
            let err = PolyviewError::NotInitialized;
            self.report(&err);
            return Err(err);
        }
        self.camera.reset_to_default(&self.extents);
        self.scheduler.request_redraw();
        while !self.should_close() {
            self.main_loop_iteration()?;
        }
        Ok(())
    }

    /// Save preferences, drop every structure, and release the platform
    /// and backend. The host can be initialized again afterwards.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if self.options.use_prefs_file {
            if let Some(platform) = self.platform.as_deref() {
                let (x, y) = platform.window_position();
                self.prefs.window_width = self.window_size.0;
                self.prefs.window_height = self.window_size.1;
                self.prefs.window_pos_x = x;
                self.prefs.window_pos_y = y;
            }
            if let Err(e) = self.prefs.save(Path::new(PREFS_FILE)) {
                log::warn!(
                    "{}could not save preferences: {e}",
                    self.options.print_prefix
                );
            }
        }
        self.remove_all_structures();
        self.contexts.truncate(1);
        self.platform = None;
        self.backend = None;
        self.initialized = false;
        log::debug!("{}shut down", self.options.print_prefix);
    }

    fn should_close(&self) -> bool {
        self.platform.as_deref().is_some_and(|p| p.should_close())
    }

    // -- Accessors --

    /// Runtime options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable runtime options. Changes to the frame cap take effect
    /// through [`Self::set_max_fps`].
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Change the frame-rate cap. `None` runs unbounded.
    pub fn set_max_fps(&mut self, max_fps: Option<u32>) {
        self.options.frame.max_fps = max_fps;
        self.scheduler.set_max_fps(max_fps);
    }

    /// The structure registry.
    #[must_use]
    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    /// Scene bounds and length scale.
    #[must_use]
    pub fn extents(&self) -> &GlobalExtents {
        &self.extents
    }

    /// Current pick selection.
    #[must_use]
    pub fn pick_state(&self) -> &PickState {
        &self.pick
    }

    /// Clear the pick selection.
    pub fn reset_selection(&mut self) {
        self.pick.reset();
    }

    /// The orbit camera.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Mutable orbit camera. Requests a redraw.
    pub fn camera_mut(&mut self) -> &mut CameraController {
        self.scheduler.request_redraw();
        &mut self.camera
    }

    /// Re-fit the camera to the scene extents.
    pub fn reset_camera(&mut self) {
        self.camera.reset_to_default(&self.extents);
        self.scheduler.request_redraw();
    }

    /// Frame pacing and redraw state.
    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Ask for the scene to be re-rasterized on the next iteration.
    pub fn request_redraw(&mut self) {
        self.scheduler.request_redraw();
    }

    /// Number of UI contexts on the stack, root included.
    #[must_use]
    pub fn context_depth(&self) -> usize {
        self.contexts.len()
    }

    /// Loaded window preferences.
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Install the UI built every iteration while no modal is active.
    pub fn set_user_callback(&mut self, callback: UiCallback) {
        self.user_callback = Some(callback);
    }

    /// Remove the per-frame user UI.
    pub fn clear_user_callback(&mut self) {
        self.user_callback = None;
    }

    /// Install the sink screenshots are written to.
    pub fn set_image_sink(&mut self, sink: Box<dyn ImageSink>) {
        self.image_sink = Some(sink);
    }

    /// Log a warning and queue it for a popup.
    pub fn warning(&mut self, message: &str, detail: &str) {
        if self.options.verbosity > 0 {
            if detail.is_empty() {
                log::warn!("{}{message}", self.options.print_prefix);
            } else {
                log::warn!("{}{message} ({detail})", self.options.print_prefix);
            }
        }
        self.warnings.push(message, detail);
    }

    /// Warnings waiting for a popup.
    #[must_use]
    pub fn pending_warnings(&self) -> usize {
        self.warnings.len()
    }

    /// Log a user-misuse error with the configured prefix.
    fn report(&self, err: &PolyviewError) {
        if self.options.verbosity > 0 {
            log::error!("{}{err}", self.options.print_prefix);
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shutdown();
    }
}
