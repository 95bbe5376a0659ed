use glam::{Quat, Vec2, Vec3};

use crate::camera::core::{Camera, ViewParams};
use crate::options::CameraOptions;
use crate::structure::GlobalExtents;

/// Multiplier applied to one unit of zoom input.
const ZOOM_STEP: f32 = 0.1;
/// Multiplier applied to one unit of clip-plane input.
const CLIP_STEP: f32 = 0.03;

/// Orbit camera around a focus point.
///
/// Rotation and translation deltas are in window-normalized units (a drag
/// across the full window width is `1.0`), so behavior does not depend on
/// window size. Distances scale with the scene length scale.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    length_scale: f32,
    near_clip_ratio: f32,
    far_clip_ratio: f32,

    /// Derived camera; rebuilt after every change.
    pub camera: Camera,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Create a camera looking at the origin of a unit scene.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let mut controller = Self {
            orientation: Quat::IDENTITY,
            distance: 1.0,
            focus_point: Vec3::ZERO,
            length_scale: 1.0,
            near_clip_ratio: options.near_clip_ratio,
            far_clip_ratio: options.far_clip_ratio,
            camera: Camera {
                eye: Vec3::Z,
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy: options.fovy,
                znear: 0.01,
                zfar: 100.0,
            },
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        };
        controller.update_camera_pos();
        controller
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
        self.camera.znear = self.near_clip_ratio * self.length_scale;
        self.camera.zfar = self.far_clip_ratio * self.length_scale;
    }

    /// Update the aspect ratio for a new framebuffer size. Zero-sized
    /// framebuffers are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit by a window-normalized drag delta.
    pub fn rotate(&mut self, delta: Vec2) {
        let scale = std::f32::consts::PI * self.rotate_speed;

        // Horizontal rotation around camera's up vector
        let up = self.orientation * Vec3::Y;
        let horizontal = Quat::from_axis_angle(up, -delta.x * scale);
        self.orientation = horizontal * self.orientation;

        // Vertical rotation around camera's right vector
        let right = self.orientation * Vec3::X;
        let vertical = Quat::from_axis_angle(right, -delta.y * scale);
        self.orientation = (vertical * self.orientation).normalize();

        self.update_camera_pos();
    }

    /// Slide the focus point in the view plane by a window-normalized delta.
    pub fn translate(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        let scale = self.distance * self.pan_speed;

        self.focus_point += right * (-delta.x * scale) + up * (delta.y * scale);
        self.update_camera_pos();
    }

    /// Move toward (positive) or away from (negative) the focus point.
    pub fn zoom(&mut self, amount: f32) {
        let factor = (-amount * ZOOM_STEP * self.zoom_speed).exp();
        self.distance = (self.distance * factor)
            .clamp(self.length_scale * 1e-3, self.length_scale * 1e3);
        self.update_camera_pos();
    }

    /// Push the near clip plane away (positive) or pull it closer.
    pub fn shift_clip_plane(&mut self, amount: f32) {
        self.near_clip_ratio = (self.near_clip_ratio
            * (1.0 + CLIP_STEP * amount))
            .clamp(1e-6, self.far_clip_ratio * 0.5);
        self.update_camera_pos();
    }

    /// Frame the whole scene: look down -Z at the scene center from a
    /// distance that fits the length scale in view.
    pub fn reset_to_default(&mut self, extents: &GlobalExtents) {
        self.length_scale = extents.length_scale().max(f32::EPSILON);
        self.focus_point = extents.center();
        self.orientation = Quat::IDENTITY;

        let radius = 0.5 * self.length_scale;
        let fovy_rad = self.camera.fovy.to_radians();
        let fit_distance = radius / (fovy_rad / 2.0).tan();
        self.distance = fit_distance * 1.5;

        self.update_camera_pos();
    }

    /// Current focus point.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    /// Current distance from eye to focus point.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Snapshot for drawing into a framebuffer of `viewport` pixels.
    #[must_use]
    pub fn view_params(&self, viewport: (u32, u32)) -> ViewParams {
        ViewParams::new(&self.camera, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraOptions::default(), 1.0)
    }

    #[test]
    fn reset_centers_on_scene() {
        let mut cam = controller();
        let extents = GlobalExtents::fold([(
            4.0,
            (Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 5.0, 1.0)),
        )]);
        cam.reset_to_default(&extents);
        assert_eq!(cam.focus_point(), Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(cam.camera.target, cam.focus_point());
        assert!(cam.camera.eye.z > cam.focus_point().z);
        assert!((cam.camera.znear - 0.005 * 4.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_in_moves_closer() {
        let mut cam = controller();
        cam.reset_to_default(&GlobalExtents::default());
        let before = cam.distance();
        cam.zoom(1.0);
        assert!(cam.distance() < before);
        cam.zoom(-2.0);
        assert!(cam.distance() > before);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut cam = controller();
        cam.reset_to_default(&GlobalExtents::default());
        let d = cam.distance();
        cam.rotate(Vec2::new(0.25, -0.1));
        let actual = (cam.camera.eye - cam.focus_point()).length();
        assert!((actual - d).abs() < 1e-4);
    }

    #[test]
    fn translate_moves_focus_in_view_plane() {
        let mut cam = controller();
        cam.reset_to_default(&GlobalExtents::default());
        cam.translate(Vec2::new(0.1, 0.0));
        assert!(cam.focus_point().x < 0.0);
        assert_eq!(cam.focus_point().z, 0.0);
    }

    #[test]
    fn clip_shift_moves_near_plane() {
        let mut cam = controller();
        cam.reset_to_default(&GlobalExtents::default());
        let near = cam.camera.znear;
        cam.shift_clip_plane(2.0);
        assert!(cam.camera.znear > near);
    }
}
