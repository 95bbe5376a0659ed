//! Small shared utilities.

/// Main-loop pacing and redraw tracking.
pub mod frame_timing;

pub use frame_timing::FrameScheduler;
