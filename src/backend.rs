//! Collaborator interfaces the host drives: the windowing/input platform and
//! the GPU rasterization backend.
//!
//! The host never talks to winit or wgpu directly. The `viewer` feature
//! provides a winit [`Platform`]; [`crate::gpu::WgpuBackend`] implements
//! [`RenderBackend`].

use crate::camera::ViewParams;
use crate::error::PolyviewError;
use crate::structure::DrawContext;

/// Windowing system and input source.
pub trait Platform {
    /// Window size in logical points.
    fn window_size(&self) -> (u32, u32);

    /// Framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Gather input since the previous call, translated for `ctx`, the
    /// context that will run this frame.
    fn poll_events(&mut self, ctx: &egui::Context) -> egui::RawInput;

    /// Whether the user asked to close the window.
    fn should_close(&self) -> bool;

    /// Window position on screen, in physical pixels.
    fn window_position(&self) -> (i32, i32);

    /// Apply cursor, clipboard, and IME requests produced by the UI.
    fn handle_platform_output(&mut self, output: egui::PlatformOutput);
}

/// Which offscreen target a render call fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassTarget {
    /// The shaded scene, cleared to this RGBA color first.
    Scene {
        /// Clear color.
        clear: [f32; 4],
    },
    /// The index-encoded pick buffer, cleared to zero first.
    Pick,
}

/// Tessellated UI ready to paint on top of the scene.
///
/// Texture ids are only unique within one context. Painters keep texture
/// state per `context_id`.
pub struct UiFrame {
    /// Context stack entry that produced this frame.
    pub context_id: u64,
    /// Entries removed from the stack since the previous frame. Their
    /// textures can be freed.
    pub retired_contexts: Vec<u64>,
    /// Clipped triangle meshes in draw order.
    pub primitives: Vec<egui::ClippedPrimitive>,
    /// Font atlas and image updates to apply before painting.
    pub textures_delta: egui::TexturesDelta,
    /// Physical pixels per point.
    pub pixels_per_point: f32,
}

/// GPU rasterization surface.
///
/// Scene and pick targets are offscreen and sized to the framebuffer.
pub trait RenderBackend {
    /// Resize the offscreen targets and presentation surface.
    fn resize(&mut self, framebuffer: (u32, u32));

    /// Bind and clear `target`, then let `draw` rasterize into it.
    fn render(
        &mut self,
        target: PassTarget,
        view: &ViewParams,
        draw: &mut dyn FnMut(&mut DrawContext<'_>),
    );

    /// Read the pick target pixel at `(x, y)` in framebuffer pixels.
    /// `None` when out of range or the readback failed.
    fn read_pick_pixel(&mut self, x: u32, y: u32) -> Option<[f32; 4]>;

    /// Composite the scene (or the pick buffer when `show_pick_buffer`) to
    /// the screen, then paint `ui` on top.
    fn present(&mut self, ui: UiFrame, show_pick_buffer: bool);

    /// Read the scene target back as tightly packed RGBA8 rows.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Readback`] when the copy or mapping fails.
    fn read_scene_pixels(&mut self)
        -> Result<(u32, u32, Vec<u8>), PolyviewError>;
}
