//! Input handling: per-frame pointer snapshots, click/drag tracking, and the
//! processor that turns them into camera commands and pick requests.

/// Drag accumulation and double-click latch.
pub(crate) mod mouse;
/// Pointer snapshot taken from egui.
pub mod pointer;
/// Converts pointer snapshots into view commands.
pub mod processor;

pub use pointer::PointerFrame;
pub use processor::{InputOutcome, InputProcessor, ViewCommand};
