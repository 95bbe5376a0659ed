//! Immediate-mode UI: the modal context stack, shared style, dashboard
//! windows, and warning popups.

/// Reentrant stack of egui contexts.
pub mod context_stack;
/// Warning queue and popup.
pub mod messages;
/// Main, structures, and selection windows.
pub mod panels;
/// Shared look applied to every context.
pub mod style;

pub use context_stack::{ContextStack, UiCallback};
pub use messages::{Warning, WarningQueue};
