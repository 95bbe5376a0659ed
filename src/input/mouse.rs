use web_time::Duration;

/// Presses closer together than this count as a double-click.
pub(crate) const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Tracks drag distance between releases and latches double-clicks.
#[derive(Debug, Default)]
pub(crate) struct ClickTracker {
    /// Window-normalized drag distance accumulated since the last release.
    drag_distance: f32,
    /// Input time of the last press that could start a double-click.
    last_press_time: Option<f64>,
    /// Whether the most recent press was a double-click.
    last_click_was_double: bool,
}

impl ClickTracker {
    /// Record a primary press at `time` seconds.
    pub(crate) fn press(&mut self, time: f64) {
        let double = self.last_press_time.is_some_and(|prev| {
            time >= prev && time - prev < DOUBLE_CLICK_THRESHOLD.as_secs_f64()
        });
        self.last_click_was_double = double;
        // A double-click consumes the pair; the next press starts fresh.
        self.last_press_time = if double { None } else { Some(time) };
    }

    /// Accumulate a window-normalized drag step.
    pub(crate) fn add_drag(&mut self, dx: f32, dy: f32) {
        self.drag_distance += dx.abs() + dy.abs();
    }

    /// Record a primary release. Returns whether the press/release pair was
    /// a click (dragged less than `threshold` in total).
    pub(crate) fn release(&mut self, threshold: f32) -> bool {
        let click = self.drag_distance < threshold;
        self.drag_distance = 0.0;
        click
    }

    /// Whether the most recent press was a double-click.
    pub(crate) fn last_click_was_double(&self) -> bool {
        self.last_click_was_double
    }

    pub(crate) fn drag_distance(&self) -> f32 {
        self.drag_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_second_press_is_double() {
        let mut t = ClickTracker::default();
        t.press(1.0);
        assert!(!t.last_click_was_double());
        t.press(1.2);
        assert!(t.last_click_was_double());
        t.press(1.3);
        assert!(!t.last_click_was_double());
    }

    #[test]
    fn slow_second_press_is_single() {
        let mut t = ClickTracker::default();
        t.press(1.0);
        t.press(1.5);
        assert!(!t.last_click_was_double());
    }

    #[test]
    fn release_resets_drag_distance() {
        let mut t = ClickTracker::default();
        t.add_drag(0.02, -0.01);
        assert!(!t.release(0.01));
        assert_eq!(t.drag_distance(), 0.0);
        t.add_drag(0.001, 0.002);
        assert!(t.release(0.01));
    }
}
