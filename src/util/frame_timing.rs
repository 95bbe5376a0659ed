use web_time::{Duration, Instant};

/// Fraction of the nominal frame period each iteration waits for.
const PACING_SLACK: f64 = 0.95;

/// Main-loop pacing, redraw-on-demand tracking, and FPS measurement.
pub struct FrameScheduler {
    /// Iteration cap (`None` = unbounded).
    max_fps: Option<u32>,
    /// Start of the previous iteration, once one has run.
    last_iteration: Option<Instant>,
    /// Whether the scene must be re-rasterized on the next iteration.
    redraw_pending: bool,
    /// Iterations run so far.
    iteration: u64,
    /// Smoothed FPS using exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0).
    smoothing: f32,
}

impl FrameScheduler {
    /// Create a scheduler with the given iteration cap. A redraw is pending
    /// initially so the first frame always draws.
    #[must_use]
    pub fn new(max_fps: Option<u32>) -> Self {
        Self {
            max_fps,
            last_iteration: None,
            redraw_pending: true,
            iteration: 0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Change the iteration cap.
    pub fn set_max_fps(&mut self, max_fps: Option<u32>) {
        self.max_fps = max_fps;
    }

    /// Current iteration cap.
    #[must_use]
    pub fn max_fps(&self) -> Option<u32> {
        self.max_fps
    }

    /// Minimum spacing between consecutive iteration starts.
    #[must_use]
    pub fn min_iteration_duration(&self) -> Duration {
        match self.max_fps {
            Some(n) if n > 0 => Duration::from_micros(
                (PACING_SLACK * (1_000_000.0 / f64::from(n))) as u64,
            ),
            _ => Duration::ZERO,
        }
    }

    /// Wait until the next iteration may start, then record it.
    ///
    /// Spins with [`std::thread::yield_now`]. Returns the recorded start
    /// time.
    pub fn pace(&mut self) -> Instant {
        let min = self.min_iteration_duration();
        if let Some(last) = self.last_iteration {
            while last.elapsed() < min {
                std::thread::yield_now();
            }
        }

        let now = Instant::now();
        if let Some(last) = self.last_iteration {
            let frame_time = now.duration_since(last).as_secs_f32();
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                    + instant_fps * self.smoothing;
            }
        }
        self.last_iteration = Some(now);
        self.iteration += 1;
        now
    }

    /// Ask for the scene to be re-rasterized on the next iteration.
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Whether a redraw is pending.
    #[must_use]
    pub fn redraw_requested(&self) -> bool {
        self.redraw_pending
    }

    /// Decide whether this iteration draws the scene, clearing the pending
    /// flag when it does.
    pub fn take_redraw(&mut self, always_redraw: bool) -> bool {
        let draw = self.redraw_pending || always_redraw;
        if draw {
            self.redraw_pending = false;
        }
        draw
    }

    /// Iterations run so far.
    #[must_use]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Smoothed iterations per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Smoothed milliseconds per iteration.
    #[must_use]
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.smoothed_fps.max(f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_spaces_iterations() {
        let mut scheduler = FrameScheduler::new(Some(60));
        let min = Duration::from_secs_f64(0.95 / 60.0)
            - Duration::from_micros(1);
        let mut prev = scheduler.pace();
        for _ in 0..3 {
            let next = scheduler.pace();
            assert!(next.duration_since(prev) >= min);
            prev = next;
        }
        assert_eq!(scheduler.iteration(), 4);
    }

    #[test]
    fn unbounded_does_not_wait() {
        let scheduler = FrameScheduler::new(None);
        assert_eq!(scheduler.min_iteration_duration(), Duration::ZERO);
        assert_eq!(
            FrameScheduler::new(Some(0)).min_iteration_duration(),
            Duration::ZERO
        );
    }

    #[test]
    fn redraw_flag_clears_after_draw() {
        let mut scheduler = FrameScheduler::new(None);
        assert!(scheduler.take_redraw(false));
        assert!(!scheduler.redraw_requested());
        assert!(!scheduler.take_redraw(false));
        scheduler.request_redraw();
        assert!(scheduler.take_redraw(false));
        assert!(scheduler.take_redraw(true));
    }
}
