//! Native window for a [`Host`], backed by winit, egui-winit and
//! egui-wgpu.
//!
//! The host owns the main loop, so events are pumped from inside
//! [`Platform::poll_events`] instead of handing control to winit.
//!
//! ```no_run
//! # use polyview::Viewer;
//! let mut host = Viewer::builder().with_title("demo").build().unwrap();
//! host.show().unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

use crate::backend::{Platform, UiFrame};
use crate::error::PolyviewError;
use crate::gpu::{OverlayPainter, OverlayTarget, RenderContext, WgpuBackend};
use crate::host::Host;
use crate::options::Options;
use crate::prefs::{Preferences, PREFS_FILE};

/// Give up if the platform never delivers a window.
const MAX_STARTUP_PUMPS: usize = 100;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for a windowed [`Host`].
pub struct ViewerBuilder {
    options: Options,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title. Defaults to `options.program_name`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Open the window, bring up the GPU, and return an initialized host.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Viewer`] when the event loop or window cannot be
    /// created, [`PolyviewError::Gpu`] when wgpu initialization fails.
    pub fn build(self) -> Result<Host, PolyviewError> {
        let prefs = if self.options.use_prefs_file {
            Preferences::load_or_default(Path::new(PREFS_FILE))
        } else {
            Preferences::default()
        };
        let title = self
            .title
            .unwrap_or_else(|| self.options.program_name.clone());
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(
                prefs.window_width.max(1),
                prefs.window_height.max(1),
            ))
            .with_position(PhysicalPosition::new(
                prefs.window_pos_x,
                prefs.window_pos_y,
            ));

        let platform = WinitPlatform::new(attrs)?;
        let window = Arc::clone(&platform.window);
        let size = platform.framebuffer_size();
        let context =
            pollster::block_on(RenderContext::new(Arc::clone(&window), size))?;
        let overlay = EguiOverlay::new(context.format());
        let mut backend = WgpuBackend::new(context);
        backend.set_overlay(Box::new(overlay));

        let mut host = Host::new(self.options);
        host.init(Box::new(platform), Box::new(backend))?;
        window.request_redraw();
        Ok(host)
    }
}

/// Entry point for windowed hosts.
pub struct Viewer;

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }
}

// ── Platform ─────────────────────────────────────────────────────────────

/// winit handler state between pumps.
struct PumpHandler {
    attrs: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    input: Option<egui_winit::State>,
    close_requested: bool,
    error: Option<String>,
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.attrs.take() else {
            return;
        };
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                // Rebound to the host's current context on the first poll.
                self.input =
                    Some(input_state(egui::Context::default(), &window));
                self.window = Some(window);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.close_requested = true;
        }
        if let (Some(window), Some(input)) = (&self.window, &mut self.input) {
            let _ = input.on_window_event(window, &event);
        }
    }
}

/// egui-winit state translating `window` events for `ctx`.
fn input_state(ctx: egui::Context, window: &Window) -> egui_winit::State {
    egui_winit::State::new(
        ctx,
        egui::ViewportId::ROOT,
        window,
        Some(window.scale_factor() as f32),
        window.theme(),
        None,
    )
}

/// [`Platform`] over a winit window. Events are translated to egui input
/// by egui-winit.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    handler: PumpHandler,
    window: Arc<Window>,
}

impl WinitPlatform {
    /// Create the event loop and pump it until the window exists.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Viewer`] when winit fails or no window appears.
    pub fn new(attrs: WindowAttributes) -> Result<Self, PolyviewError> {
        let mut event_loop = EventLoop::new()
            .map_err(|e| PolyviewError::Viewer(e.to_string()))?;
        let mut handler = PumpHandler {
            attrs: Some(attrs),
            window: None,
            input: None,
            close_requested: false,
            error: None,
        };
        for _ in 0..MAX_STARTUP_PUMPS {
            let status = event_loop
                .pump_app_events(Some(Duration::from_millis(10)), &mut handler);
            if let Some(error) = handler.error.take() {
                return Err(PolyviewError::Viewer(error));
            }
            if let Some(window) = handler.window.clone() {
                return Ok(Self {
                    event_loop,
                    handler,
                    window,
                });
            }
            if let PumpStatus::Exit(code) = status {
                return Err(PolyviewError::Viewer(format!(
                    "event loop exited during startup ({code})"
                )));
            }
        }
        Err(PolyviewError::Viewer("window was never created".to_owned()))
    }

    /// The underlying winit window.
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Platform for WinitPlatform {
    fn window_size(&self) -> (u32, u32) {
        let logical: LogicalSize<u32> = self
            .window
            .inner_size()
            .to_logical(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn poll_events(&mut self, ctx: &egui::Context) -> egui::RawInput {
        // Zoom, pixels-per-point and IME bookkeeping follow the context
        // that runs the frame. Switching drops only events not yet taken,
        // and there are none between frames.
        let stale = self
            .handler
            .input
            .as_ref()
            .is_some_and(|input| input.egui_ctx() != ctx);
        if stale {
            self.handler.input = Some(input_state(ctx.clone(), &self.window));
        }
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        if matches!(status, PumpStatus::Exit(_)) {
            self.handler.close_requested = true;
        }
        self.handler
            .input
            .as_mut()
            .map(|input| input.take_egui_input(&self.window))
            .unwrap_or_default()
    }

    fn should_close(&self) -> bool {
        self.handler.close_requested
    }

    fn window_position(&self) -> (i32, i32) {
        self.window
            .outer_position()
            .map(|p| (p.x, p.y))
            .unwrap_or_default()
    }

    fn handle_platform_output(&mut self, output: egui::PlatformOutput) {
        if let Some(input) = self.handler.input.as_mut() {
            input.handle_platform_output(&self.window, output);
        }
    }
}

// ── Overlay ──────────────────────────────────────────────────────────────

/// Paints egui output with egui-wgpu.
///
/// Every context on the host's stack has its own font atlas under the same
/// texture ids, so each gets its own renderer.
pub struct EguiOverlay {
    format: wgpu::TextureFormat,
    renderers: FxHashMap<u64, egui_wgpu::Renderer>,
}

impl EguiOverlay {
    /// Create an overlay for a swapchain of `format`.
    #[must_use]
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            renderers: FxHashMap::default(),
        }
    }

    fn renderer(
        &mut self,
        device: &wgpu::Device,
        context_id: u64,
    ) -> &mut egui_wgpu::Renderer {
        let format = self.format;
        self.renderers.entry(context_id).or_insert_with(|| {
            egui_wgpu::Renderer::new(
                device,
                format,
                egui_wgpu::RendererOptions::default(),
            )
        })
    }
}

impl OverlayPainter for EguiOverlay {
    fn paint(
        &mut self,
        target: OverlayTarget<'_>,
        ui: UiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [target.size.0, target.size.1],
            pixels_per_point: ui.pixels_per_point,
        };
        let renderer = self.renderer(target.device, ui.context_id);
        for (id, delta) in &ui.textures_delta.set {
            renderer.update_texture(target.device, target.queue, *id, delta);
        }
        let buffers = renderer.update_buffers(
            target.device,
            target.queue,
            target.encoder,
            &ui.primitives,
            &screen,
        );
        {
            let mut pass = target
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("UI Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: target.view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    ..Default::default()
                })
                .forget_lifetime();
            renderer.render(&mut pass, &ui.primitives, &screen);
        }
        for id in &ui.textures_delta.free {
            renderer.free_texture(id);
        }
        buffers
    }

    fn skip(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ui: UiFrame,
    ) {
        let renderer = self.renderer(device, ui.context_id);
        for (id, delta) in &ui.textures_delta.set {
            renderer.update_texture(device, queue, *id, delta);
        }
        for id in &ui.textures_delta.free {
            renderer.free_texture(id);
        }
    }

    fn retire(&mut self, context_ids: &[u64]) {
        for id in context_ids {
            let _ = self.renderers.remove(id);
        }
    }
}
