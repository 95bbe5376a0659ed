//! Scene structures: the polymorphic capability every renderable object
//! implements, plus the registry that owns them and the global extents
//! derived from it.

/// Global bounding box, center, and length scale.
pub mod extents;
/// Type-tag → name → structure ownership map.
pub mod registry;

use std::any::Any;

use glam::Vec3;

pub use extents::GlobalExtents;
pub use registry::{Rejected, StructureRegistry};

use crate::camera::ViewParams;

/// Registry-assigned identity of a registered structure.
///
/// Ids are never reused within one host, so a stale id held by the pick
/// state can never resolve to a structure registered later under the same
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(pub u64);

/// The `(type, name)` pair identifying a structure from the user's side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureKey {
    /// Type tag (e.g. "Point Cloud").
    pub type_name: String,
    /// Instance name, unique within the type tag.
    pub name: String,
}

impl StructureKey {
    /// Build a key from borrowed parts.
    #[must_use]
    pub fn new(type_name: &str, name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Which buffer a draw call is rendering into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPass {
    /// The shaded scene buffer.
    Scene,
    /// The index-encoded pick buffer.
    Pick,
}

/// Live GPU handles for structures that rasterize through wgpu.
pub struct GpuPass<'a> {
    /// The wgpu logical device.
    pub device: &'a wgpu::Device,
    /// The wgpu command queue.
    pub queue: &'a wgpu::Queue,
    /// The open render pass for the current target.
    pub pass: &'a mut wgpu::RenderPass<'static>,
    /// Color format of the current target.
    pub format: wgpu::TextureFormat,
    /// Depth format of the current target.
    pub depth_format: wgpu::TextureFormat,
}

/// Everything a structure needs to draw itself for one pass.
///
/// The camera and viewport are identical between the scene and pick
/// passes of a frame. `gpu` is `None` for headless backends.
pub struct DrawContext<'a> {
    /// Which buffer is being rendered.
    pub pass: DrawPass,
    /// Camera matrices and viewport for this frame.
    pub view: &'a ViewParams,
    /// Live GPU pass, when rendering through wgpu.
    pub gpu: Option<GpuPass<'a>>,
}

/// A registered, named, typed visual scene object.
///
/// Drawing code lives entirely in the implementor; the host only decides
/// when each method is called. Implementors cannot reach the registry from
/// inside these methods, so drawing never changes membership.
pub trait Structure {
    /// Type tag grouping structures of one kind.
    fn type_name(&self) -> &str;

    /// Instance name, unique within the type tag.
    fn name(&self) -> &str;

    /// Rasterize the shaded representation.
    fn draw(&mut self, ctx: &mut DrawContext<'_>);

    /// Rasterize the pick representation: every pixel's color encodes a
    /// global pick index (see [`crate::picking::encoding`]).
    fn draw_pick(&mut self, ctx: &mut DrawContext<'_>);

    /// Per-instance controls in the "Structures" window.
    fn draw_ui(&mut self, ui: &mut egui::Ui);

    /// Details for the element `local_index` in the "Selection" window.
    fn draw_pick_ui(&mut self, ui: &mut egui::Ui, local_index: u64);

    /// Controls shared by every instance of this type. Called on the first
    /// instance of each type only.
    fn draw_shared_structure_ui(&mut self, _ui: &mut egui::Ui) {}

    /// Axis-aligned bounds in world space. A structure with nothing to bound
    /// returns `(+inf, -inf)`, which leaves the folded scene box unchanged.
    fn bounding_box(&self) -> (Vec3, Vec3);

    /// Characteristic size. `0.0` means "no opinion".
    fn length_scale(&self) -> f32;

    /// Number of pickable elements; a contiguous range of this many global
    /// indices is allocated at registration.
    fn pick_element_count(&self) -> u64 {
        0
    }

    /// Receives the first global index of this structure's pick range.
    fn set_pick_range(&mut self, _start: u64) {}

    /// Upcast for typed queries.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed queries.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Structure {
    /// Key of this structure.
    #[must_use]
    pub fn key(&self) -> StructureKey {
        StructureKey::new(self.type_name(), self.name())
    }
}

#[cfg(test)]
pub(crate) mod test_structure {
    use std::any::Any;

    use glam::Vec3;

    use super::{DrawContext, DrawPass, Structure};

    /// Minimal structure with configurable extents that records draws.
    pub(crate) struct Dummy {
        pub type_name: String,
        pub name: String,
        pub bbox: (Vec3, Vec3),
        pub scale: f32,
        pub pick_count: u64,
        pub pick_start: Option<u64>,
        pub scene_draws: usize,
        pub pick_draws: usize,
    }

    impl Dummy {
        pub(crate) fn new(type_name: &str, name: &str) -> Self {
            Self {
                type_name: type_name.to_owned(),
                name: name.to_owned(),
                bbox: (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
                scale: 0.0,
                pick_count: 0,
                pick_start: None,
                scene_draws: 0,
                pick_draws: 0,
            }
        }

        pub(crate) fn with_bounds(mut self, min: Vec3, max: Vec3) -> Self {
            self.bbox = (min, max);
            self
        }

        pub(crate) fn with_scale(mut self, scale: f32) -> Self {
            self.scale = scale;
            self
        }

        pub(crate) fn with_pick_count(mut self, count: u64) -> Self {
            self.pick_count = count;
            self
        }

        pub(crate) fn boxed(self) -> Box<dyn Structure> {
            Box::new(self)
        }
    }

    impl Structure for Dummy {
        fn type_name(&self) -> &str {
            &self.type_name
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn draw(&mut self, ctx: &mut DrawContext<'_>) {
            assert_eq!(ctx.pass, DrawPass::Scene);
            self.scene_draws += 1;
        }

        fn draw_pick(&mut self, ctx: &mut DrawContext<'_>) {
            assert_eq!(ctx.pass, DrawPass::Pick);
            self.pick_draws += 1;
        }

        fn draw_ui(&mut self, ui: &mut egui::Ui) {
            let _ = ui.label(&self.name);
        }

        fn draw_pick_ui(&mut self, ui: &mut egui::Ui, local_index: u64) {
            let _ = ui.label(format!("element {local_index}"));
        }

        fn bounding_box(&self) -> (Vec3, Vec3) {
            self.bbox
        }

        fn length_scale(&self) -> f32 {
            self.scale
        }

        fn pick_element_count(&self) -> u64 {
            self.pick_count
        }

        fn set_pick_range(&mut self, start: u64) {
            self.pick_start = Some(start);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
}
