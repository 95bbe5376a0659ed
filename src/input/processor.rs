//! Converts per-frame pointer snapshots into view commands and pick
//! requests.
//!
//! The `InputProcessor` owns all transient input state (drag distance since
//! the last release, double-click timing). It is the only thing that sits
//! between the egui input state and the camera/pick system.

use glam::Vec2;

use super::mouse::ClickTracker;
use super::pointer::PointerFrame;

/// Total window-normalized drag below which a release counts as a click.
pub const CLICK_DRAG_THRESHOLD: f32 = 0.01;

/// Scroll points per wheel notch (egui's default line scroll speed).
const SCROLL_POINTS_PER_TICK: f32 = 40.0;

/// A camera manipulation derived from pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Zoom by this many steps (positive = closer).
    Zoom(f32),
    /// Move the near clip plane by this many steps.
    ClipPlaneShift(f32),
    /// Orbit by a window-normalized delta.
    Rotate(Vec2),
    /// Pan by a window-normalized delta.
    Translate(Vec2),
}

/// What one frame of input asks the host to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOutcome {
    /// Camera manipulations, in order.
    pub commands: Vec<ViewCommand>,
    /// The scene must be re-rasterized.
    pub redraw: bool,
    /// Evaluate a pick at this framebuffer pixel.
    pub pick_at: Option<Vec2>,
    /// The press behind this frame's click was a double-click.
    pub double_click: bool,
}

/// Converts [`PointerFrame`]s into [`InputOutcome`]s.
///
/// # Usage
///
/// ```ignore
/// let outcome = input.process(&PointerFrame::capture(ctx), window_size, false);
/// for cmd in &outcome.commands {
///     camera.apply(cmd);
/// }
/// ```
#[derive(Debug, Default)]
pub struct InputProcessor {
    clicks: ClickTracker,
}

impl InputProcessor {
    /// Create a processor with no click history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one frame of pointer state.
    ///
    /// `window_size` is in points; drag deltas are normalized by it. With
    /// `always_evaluate`, a pick is requested every frame at the pointer.
    pub fn process(
        &mut self,
        frame: &PointerFrame,
        window_size: (u32, u32),
        always_evaluate: bool,
    ) -> InputOutcome {
        let mut outcome = InputOutcome {
            redraw: frame.any_down,
            ..InputOutcome::default()
        };

        if !frame.ui_wants_pointer {
            Self::process_scroll(frame, &mut outcome);
        }

        if frame.primary_pressed {
            self.clicks.press(frame.time);
        }

        let mut should_pick = always_evaluate;
        if frame.primary_released {
            // Every release ends the drag, even one over the UI.
            let click = self.clicks.release(CLICK_DRAG_THRESHOLD);
            should_pick |= click && !frame.ui_wants_pointer;
        } else if !frame.ui_wants_pointer
            && frame.primary_dragging
            // Ctrl without shift is left to the embedder.
            && !(frame.ctrl && !frame.shift)
        {
            self.process_drag(frame, window_size, &mut outcome);
        }

        if should_pick {
            outcome.pick_at =
                frame.pos.map(|p| p * frame.pixels_per_point);
            outcome.double_click = self.clicks.last_click_was_double();
        }
        outcome
    }

    fn process_scroll(frame: &PointerFrame, outcome: &mut InputOutcome) {
        if frame.scroll == Vec2::ZERO {
            return;
        }
        outcome.redraw = true;

        // Some platforms turn shift+wheel into horizontal scroll, so take
        // whichever axis moved more.
        let max_scroll = if frame.scroll.y.abs() > frame.scroll.x.abs() {
            frame.scroll.y
        } else {
            frame.scroll.x
        } / SCROLL_POINTS_PER_TICK;

        if max_scroll != 0.0 {
            outcome.commands.push(if frame.shift {
                ViewCommand::ClipPlaneShift(max_scroll)
            } else {
                ViewCommand::Zoom(max_scroll)
            });
        }
    }

    fn process_drag(
        &mut self,
        frame: &PointerFrame,
        (width, height): (u32, u32),
        outcome: &mut InputOutcome,
    ) {
        outcome.redraw = true;

        let drag = Vec2::new(
            frame.delta.x / width.max(1) as f32,
            -frame.delta.y / height.max(1) as f32,
        );
        let command = if frame.shift && frame.ctrl {
            ViewCommand::Zoom(drag.y * 5.0)
        } else if frame.shift {
            ViewCommand::Translate(drag)
        } else {
            ViewCommand::Rotate(drag)
        };
        outcome.commands.push(command);
        self.clicks.add_drag(drag.x, drag.y);
    }
}
