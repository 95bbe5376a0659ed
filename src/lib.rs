// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive core of a GPU scientific-visualization host.
//!
//! A [`Host`] owns a registry of named, typed [`Structure`]s, renders them
//! through a [`RenderBackend`], and resolves clicks to individual elements
//! with an offscreen pick buffer. Dashboards and modal dialogs are egui
//! contexts on a stack: pushing one drives the main loop until it pops.
//!
//! # Key entry points
//!
//! - [`Host`] - registry, picking, modal contexts, and the main loop
//! - [`Structure`] - implemented by anything that draws into the scene
//! - [`options::Options`] - runtime configuration (frame pacing, picking,
//!   camera)
//! - [`gpu::WgpuBackend`] - the wgpu [`RenderBackend`]
//! - `Viewer` (feature `viewer`) - winit window + egui painting
//!
//! # Frame
//!
//! Each [`Host::main_loop_iteration`] paces to `max_fps`, polls input,
//! evaluates pending pick queries, builds the UI for the top context,
//! redraws the scene only when something requested it, and presents.

/// Platform and render-backend interfaces the host drives.
pub mod backend;
/// Orbit camera and view matrices.
pub mod camera;
/// Crate error type.
pub mod error;
/// wgpu implementation of the render backend.
pub mod gpu;
/// The host object and its main loop.
pub mod host;
/// Pointer handling for camera control and pick requests.
pub mod input;
/// Runtime configuration.
pub mod options;
/// Pick index encoding, allocation, and selection state.
pub mod picking;
/// Persisted window geometry.
pub mod prefs;
/// Screenshot images and the sink they are written to.
pub mod screenshot;
/// The structure trait, registry, and scene extents.
pub mod structure;
/// egui context stack, dashboards, and warning popups.
pub mod ui;
/// Small shared utilities.
pub mod util;
/// Native window via winit.
#[cfg(feature = "viewer")]
pub mod viewer;

pub use backend::{PassTarget, Platform, RenderBackend, UiFrame};
pub use error::PolyviewError;
pub use host::Host;
pub use options::Options;
pub use picking::{PickState, Selection};
pub use screenshot::{ImageSink, ScreenshotImage};
pub use structure::{DrawContext, DrawPass, Structure, StructureId};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
