use glam::Vec2;

/// Pointer and modifier state for one loop iteration, captured from the
/// current egui context after input has been fed to it.
///
/// Positions and deltas are in egui points (logical pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerFrame {
    /// Any mouse button is held.
    pub any_down: bool,
    /// The primary button went down this frame.
    pub primary_pressed: bool,
    /// The primary button went up this frame.
    pub primary_released: bool,
    /// The primary button is held and has moved past egui's click
    /// tolerance.
    pub primary_dragging: bool,
    /// Pointer movement since the previous frame.
    pub delta: Vec2,
    /// Scroll wheel movement this frame (unsmoothed).
    pub scroll: Vec2,
    /// Shift is held.
    pub shift: bool,
    /// Ctrl is held.
    pub ctrl: bool,
    /// Latest pointer position, if the pointer is over the window.
    pub pos: Option<Vec2>,
    /// The UI is using the pointer (hovering or dragging a window).
    pub ui_wants_pointer: bool,
    /// Physical pixels per point.
    pub pixels_per_point: f32,
    /// Input timestamp in seconds.
    pub time: f64,
}

impl Default for PointerFrame {
    fn default() -> Self {
        Self {
            any_down: false,
            primary_pressed: false,
            primary_released: false,
            primary_dragging: false,
            delta: Vec2::ZERO,
            scroll: Vec2::ZERO,
            shift: false,
            ctrl: false,
            pos: None,
            ui_wants_pointer: false,
            pixels_per_point: 1.0,
            time: 0.0,
        }
    }
}

impl PointerFrame {
    /// Snapshot the pointer state of `ctx`. Must be called inside
    /// `Context::run` (or after `begin_pass`).
    #[must_use]
    pub fn capture(ctx: &egui::Context) -> Self {
        let ui_wants_pointer = ctx.wants_pointer_input();
        ctx.input(|i| {
            let delta = i.pointer.delta();
            let scroll = i.raw_scroll_delta;
            Self {
                any_down: i.pointer.any_down(),
                primary_pressed: i.pointer.primary_pressed(),
                primary_released: i.pointer.primary_released(),
                primary_dragging: i.pointer.primary_down()
                    && i.pointer.is_decidedly_dragging(),
                delta: Vec2::new(delta.x, delta.y),
                scroll: Vec2::new(scroll.x, scroll.y),
                shift: i.modifiers.shift,
                ctrl: i.modifiers.ctrl || i.modifiers.command,
                pos: i.pointer.latest_pos().map(|p| Vec2::new(p.x, p.y)),
                ui_wants_pointer,
                pixels_per_point: i.pixels_per_point,
                time: i.time,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(events: Vec<egui::Event>) -> PointerFrame {
        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            events,
            ..Default::default()
        };
        let mut frame = PointerFrame::default();
        let _ = ctx.run(raw, |ctx| {
            frame = PointerFrame::capture(ctx);
        });
        frame
    }

    #[test]
    fn idle_frame_has_nothing_pressed() {
        let frame = run_with(Vec::new());
        assert!(!frame.any_down);
        assert!(!frame.primary_pressed);
        assert_eq!(frame.scroll, Vec2::ZERO);
    }

    #[test]
    fn press_is_seen_in_the_same_frame() {
        let pos = egui::pos2(40.0, 30.0);
        let frame = run_with(vec![
            egui::Event::PointerMoved(pos),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::SHIFT,
            },
        ]);
        assert!(frame.primary_pressed);
        assert!(frame.any_down);
        assert_eq!(frame.pos, Some(Vec2::new(40.0, 30.0)));
    }
}
