//! [`RenderBackend`] implemented on wgpu.

use crate::backend::{PassTarget, RenderBackend, UiFrame};
use crate::camera::ViewParams;
use crate::error::PolyviewError;
use crate::gpu::composite::{CompositePass, CompositeSource};
use crate::gpu::readback;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{RenderTarget, DEPTH_FORMAT};
use crate::structure::{DrawContext, DrawPass, GpuPass};

/// Scene target color format. Screenshots read it back as RGBA8.
pub const SCENE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8Unorm;
/// Pick target format. Full float precision keeps 24-bit indices exact.
pub const PICK_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba32Float;

const PICK_BYTES_PER_PIXEL: u32 = 16;
const SCENE_BYTES_PER_PIXEL: u32 = 4;

/// Where an overlay paints during [`RenderBackend::present`].
pub struct OverlayTarget<'a> {
    /// The wgpu logical device.
    pub device: &'a wgpu::Device,
    /// The wgpu command queue.
    pub queue: &'a wgpu::Queue,
    /// Encoder holding the composite pass; record after it.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Swapchain view for this frame.
    pub view: &'a wgpu::TextureView,
    /// Swapchain size in pixels.
    pub size: (u32, u32),
}

/// Paints tessellated UI on top of the composited scene.
pub trait OverlayPainter {
    /// Upload texture changes and record the UI draw. Returned command
    /// buffers are submitted ahead of the frame encoder.
    fn paint(
        &mut self,
        target: OverlayTarget<'_>,
        ui: UiFrame,
    ) -> Vec<wgpu::CommandBuffer>;

    /// Apply the texture changes of a frame that will not be painted, so
    /// later partial updates land on the right atlas.
    fn skip(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ui: UiFrame,
    );

    /// Free texture state held for these UI contexts.
    fn retire(&mut self, context_ids: &[u64]);
}

/// Offscreen scene and pick targets plus the swapchain they composite to.
pub struct WgpuBackend {
    context: RenderContext,
    scene: RenderTarget,
    pick: RenderTarget,
    composite: CompositePass,
    overlay: Option<Box<dyn OverlayPainter>>,
}

impl WgpuBackend {
    /// Create targets sized to the context's surface.
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        let size = context.size();
        let device = &context.device;
        let scene =
            RenderTarget::new(device, "Scene Target", size, SCENE_FORMAT);
        let pick = RenderTarget::new(device, "Pick Target", size, PICK_FORMAT);
        let composite =
            CompositePass::new(device, context.format(), &scene, &pick);
        Self {
            context,
            scene,
            pick,
            composite,
            overlay: None,
        }
    }

    /// Install the UI painter. Without one, `present` shows only the scene.
    pub fn set_overlay(&mut self, overlay: Box<dyn OverlayPainter>) {
        self.overlay = Some(overlay);
    }

    fn present_frame(&mut self, ui: UiFrame, show_pick_buffer: bool) {
        let Some(frame) = self.acquire_frame() else {
            if let Some(overlay) = self.overlay.as_deref_mut() {
                overlay.skip(&self.context.device, &self.context.queue, ui);
            }
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let source = if show_pick_buffer {
            CompositeSource::Pick
        } else {
            CompositeSource::Scene
        };

        let mut encoder = self.context.create_encoder("Present Encoder");
        self.composite.render(&mut encoder, &view, source);
        let extra = match self.overlay.as_deref_mut() {
            Some(overlay) => overlay.paint(
                OverlayTarget {
                    device: &self.context.device,
                    queue: &self.context.queue,
                    encoder: &mut encoder,
                    view: &view,
                    size: self.context.size(),
                },
                ui,
            ),
            None => Vec::new(),
        };
        self.context.submit(extra, encoder);
        frame.present();
    }

    /// The underlying device, queue and surface.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn acquire_frame(&self) -> Option<wgpu::SurfaceTexture> {
        match self.context.get_next_frame() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                None
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                None
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn resize(&mut self, framebuffer: (u32, u32)) {
        let (width, height) = framebuffer;
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        let device = &self.context.device;
        self.scene = RenderTarget::new(
            device,
            "Scene Target",
            framebuffer,
            SCENE_FORMAT,
        );
        self.pick =
            RenderTarget::new(device, "Pick Target", framebuffer, PICK_FORMAT);
        self.composite.rebind(device, &self.scene, &self.pick);
    }

    fn render(
        &mut self,
        target: PassTarget,
        view: &ViewParams,
        draw: &mut dyn FnMut(&mut DrawContext<'_>),
    ) {
        let (rt, clear, draw_pass, label) = match target {
            PassTarget::Scene { clear: [r, g, b, a] } => (
                &self.scene,
                wgpu::Color {
                    r: f64::from(r),
                    g: f64::from(g),
                    b: f64::from(b),
                    a: f64::from(a),
                },
                DrawPass::Scene,
                "Scene Pass",
            ),
            PassTarget::Pick => (
                &self.pick,
                wgpu::Color::TRANSPARENT,
                DrawPass::Pick,
                "Pick Pass",
            ),
        };

        let mut encoder = self.context.create_encoder(label);
        {
            let mut pass =
                rt.begin_pass(&mut encoder, label, clear).forget_lifetime();
            draw(&mut DrawContext {
                pass: draw_pass,
                view,
                gpu: Some(GpuPass {
                    device: &self.context.device,
                    queue: &self.context.queue,
                    pass: &mut pass,
                    format: rt.format,
                    depth_format: DEPTH_FORMAT,
                }),
            });
        }
        self.context.submit(Vec::new(), encoder);
    }

    fn read_pick_pixel(&mut self, x: u32, y: u32) -> Option<[f32; 4]> {
        let (width, height) = self.pick.size;
        if x >= width || y >= height {
            return None;
        }
        let bytes = readback::read_region(
            &self.context.device,
            &self.context.queue,
            &self.pick.texture,
            (x, y),
            (1, 1),
            PICK_BYTES_PER_PIXEL,
        )
        .inspect_err(|e| log::warn!("pick readback failed: {e}"))
        .ok()?;
        bytes
            .get(..PICK_BYTES_PER_PIXEL as usize)
            .map(bytemuck::pod_read_unaligned::<[f32; 4]>)
    }

    fn present(&mut self, mut ui: UiFrame, show_pick_buffer: bool) {
        let retired = std::mem::take(&mut ui.retired_contexts);
        if self.context.has_surface() {
            self.present_frame(ui, show_pick_buffer);
        } else if let Some(overlay) = self.overlay.as_deref_mut() {
            overlay.skip(&self.context.device, &self.context.queue, ui);
        }
        if let Some(overlay) = self.overlay.as_deref_mut() {
            overlay.retire(&retired);
        }
    }

    fn read_scene_pixels(
        &mut self,
    ) -> Result<(u32, u32, Vec<u8>), PolyviewError> {
        let (width, height) = self.scene.size;
        let pixels = readback::read_region(
            &self.context.device,
            &self.context.queue,
            &self.scene.texture,
            (0, 0),
            (width, height),
            SCENE_BYTES_PER_PIXEL,
        )?;
        Ok((width, height, pixels))
    }
}
