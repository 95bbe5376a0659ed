use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// World-to-view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View-to-clip matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

/// Camera state for one frame, shared by the scene and pick passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// Eye position in world space.
    pub eye: Vec3,
    /// Framebuffer size in physical pixels.
    pub viewport: (u32, u32),
}

impl ViewParams {
    /// Snapshot `camera` for a framebuffer of `viewport` pixels.
    #[must_use]
    pub fn new(camera: &Camera, viewport: (u32, u32)) -> Self {
        Self {
            view: camera.build_view(),
            projection: camera.build_projection(),
            eye: camera.eye,
            viewport,
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Uniform block for structures that draw through wgpu.
    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: self.eye.to_array(),
            _pad0: 0.0,
            viewport: [self.viewport.0 as f32, self.viewport.1 as f32],
            _pad1: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    pub(crate) _pad0: f32,
    /// Framebuffer size in pixels.
    pub viewport: [f32; 2],
    pub(crate) _pad1: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_std140_sized() {
        assert_eq!(size_of::<CameraUniform>(), 96);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.5,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        };
        let params = ViewParams::new(&camera, (300, 200));
        let clip = params.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        assert_eq!(params.uniform().viewport, [300.0, 200.0]);
    }
}
