//! Headless collaborators for host tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::Host;
use crate::backend::{PassTarget, Platform, RenderBackend, UiFrame};
use crate::camera::ViewParams;
use crate::error::PolyviewError;
use crate::options::Options;
use crate::structure::{DrawContext, DrawPass};

/// Scripted window state shared with the test.
pub(crate) struct PlatformState {
    pub window: (u32, u32),
    pub framebuffer: (u32, u32),
    pub inputs: VecDeque<egui::RawInput>,
    pub polls: usize,
    /// Report close once this many polls have happened.
    pub close_after: Option<usize>,
    /// Context passed to the latest poll.
    pub polled_context: Option<egui::Context>,
}

impl PlatformState {
    /// Queue one frame of input events.
    pub fn push_events(&mut self, events: Vec<egui::Event>) {
        self.inputs.push_back(egui::RawInput {
            events,
            ..Default::default()
        });
    }
}

pub(crate) struct FakePlatform(pub Rc<RefCell<PlatformState>>);

impl Platform for FakePlatform {
    fn window_size(&self) -> (u32, u32) {
        self.0.borrow().window
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.0.borrow().framebuffer
    }

    fn poll_events(&mut self, ctx: &egui::Context) -> egui::RawInput {
        let mut state = self.0.borrow_mut();
        state.polls += 1;
        state.polled_context = Some(ctx.clone());
        let (w, h) = state.window;
        let mut raw = state.inputs.pop_front().unwrap_or_default();
        raw.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(w as f32, h as f32),
        ));
        raw
    }

    fn should_close(&self) -> bool {
        let state = self.0.borrow();
        state.close_after.is_some_and(|n| state.polls >= n)
    }

    fn window_position(&self) -> (i32, i32) {
        (20, 20)
    }

    fn handle_platform_output(&mut self, _output: egui::PlatformOutput) {}
}

/// Texture traffic of one presented UI frame.
#[derive(Debug, Clone)]
pub(crate) struct PresentedUi {
    pub context_id: u64,
    pub retired_contexts: Vec<u64>,
    /// `(texture, whole image)` for every texture set.
    pub uploads: Vec<(egui::TextureId, bool)>,
}

/// What the fake backend was asked to do, plus canned readback values.
#[derive(Default)]
pub(crate) struct BackendLog {
    pub resizes: Vec<(u32, u32)>,
    pub scene_renders: usize,
    pub pick_renders: usize,
    pub presents: usize,
    pub presented_ui: Vec<PresentedUi>,
    pub last_clear: Option<[f32; 4]>,
    pub pick_pixel: Option<[f32; 4]>,
    pub scene_pixels: (u32, u32, Vec<u8>),
}

pub(crate) struct FakeBackend(pub Rc<RefCell<BackendLog>>);

impl RenderBackend for FakeBackend {
    fn resize(&mut self, framebuffer: (u32, u32)) {
        self.0.borrow_mut().resizes.push(framebuffer);
    }

    fn render(
        &mut self,
        target: PassTarget,
        view: &ViewParams,
        draw: &mut dyn FnMut(&mut DrawContext<'_>),
    ) {
        let pass = match target {
            PassTarget::Scene { clear } => {
                let mut log = self.0.borrow_mut();
                log.scene_renders += 1;
                log.last_clear = Some(clear);
                DrawPass::Scene
            }
            PassTarget::Pick => {
                self.0.borrow_mut().pick_renders += 1;
                DrawPass::Pick
            }
        };
        draw(&mut DrawContext {
            pass,
            view,
            gpu: None,
        });
    }

    fn read_pick_pixel(&mut self, _x: u32, _y: u32) -> Option<[f32; 4]> {
        self.0.borrow().pick_pixel
    }

    fn present(&mut self, ui: UiFrame, _show_pick_buffer: bool) {
        let uploads = ui
            .textures_delta
            .set
            .iter()
            .map(|(id, delta)| (*id, delta.is_whole()))
            .collect();
        let mut log = self.0.borrow_mut();
        log.presents += 1;
        log.presented_ui.push(PresentedUi {
            context_id: ui.context_id,
            retired_contexts: ui.retired_contexts,
            uploads,
        });
    }

    fn read_scene_pixels(
        &mut self,
    ) -> Result<(u32, u32, Vec<u8>), PolyviewError> {
        Ok(self.0.borrow().scene_pixels.clone())
    }
}

/// Options suitable for tests: unbounded frame rate, no prefs file.
pub(crate) fn test_options() -> Options {
    let mut options = Options::default();
    options.frame.max_fps = None;
    options.use_prefs_file = false;
    options
}

/// Fresh fakes for a 1280x720 window.
pub(crate) fn fakes() -> (
    Box<dyn Platform>,
    Box<dyn RenderBackend>,
    Rc<RefCell<PlatformState>>,
    Rc<RefCell<BackendLog>>,
) {
    let platform = Rc::new(RefCell::new(PlatformState {
        window: (1280, 720),
        framebuffer: (1280, 720),
        inputs: VecDeque::new(),
        polls: 0,
        close_after: None,
        polled_context: None,
    }));
    let backend = Rc::new(RefCell::new(BackendLog {
        scene_pixels: (1, 1, vec![0, 0, 0, 255]),
        ..Default::default()
    }));
    (
        Box::new(FakePlatform(Rc::clone(&platform))),
        Box::new(FakeBackend(Rc::clone(&backend))),
        platform,
        backend,
    )
}

/// An initialized host wired to fresh fakes.
pub(crate) fn fake_host(
    options: Options,
) -> (Host, Rc<RefCell<PlatformState>>, Rc<RefCell<BackendLog>>) {
    let mut host = Host::new(options);
    let (platform, backend, platform_state, backend_log) = fakes();
    host.init(platform, backend).unwrap();
    (host, platform_state, backend_log)
}
