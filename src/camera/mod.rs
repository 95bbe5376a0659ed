//! Camera system for 3D scene viewing.
//!
//! Provides an orbital camera with rotation, panning, zoom, and clip-plane
//! control, plus the per-frame [`ViewParams`] handed to structures.

/// Orbital camera controller managing rotation, pan, and zoom.
pub mod controller;
/// Core camera struct, per-frame view parameters, and GPU uniform type.
pub mod core;

pub use controller::CameraController;
pub use self::core::{Camera, CameraUniform, ViewParams};
