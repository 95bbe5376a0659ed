//! wgpu rendering backend.
//!
//! Owns the device and surface, the offscreen scene and pick targets, the
//! composite blit, and synchronous pixel readback.

/// [`crate::backend::RenderBackend`] on wgpu.
pub mod backend;
/// Full-screen blit of an offscreen target to the swapchain.
pub mod composite;
/// Shared wgpu boilerplate for screen-space pipelines.
pub mod pipeline_helpers;
/// Blocking texture-to-CPU copies.
pub mod readback;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Offscreen color + depth targets.
pub mod texture;

pub use backend::{OverlayPainter, OverlayTarget, WgpuBackend};
pub use render_context::{RenderContext, RenderContextError};
