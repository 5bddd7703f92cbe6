use web_time::{Duration, Instant};

/// Per-frame delta source with FPS smoothing and optional frame limiting.
///
/// Deltas are clamped to `max_delta` so a stall (debugger pause, window
/// drag) does not launch the camera across the scene on the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Largest delta handed out, in seconds
    max_delta: f32,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Create a clock with the given FPS target (0 = unlimited) and delta
    /// clamp in seconds.
    #[must_use]
    pub fn new(target_fps: u32, max_delta: f32) -> Self {
        Self::starting_at(Instant::now(), target_fps, max_delta)
    }

    /// Create a clock whose first frame starts at `start`.
    #[must_use]
    pub fn starting_at(
        start: Instant,
        target_fps: u32,
        max_delta: f32,
    ) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            max_delta,
            last_frame: start,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last tick to render again.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.should_render_at(Instant::now())
    }

    /// [`should_render`](Self::should_render) evaluated at `now`.
    #[must_use]
    pub fn should_render_at(&self, now: Instant) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        let elapsed = now.saturating_duration_since(self.last_frame);
        elapsed >= self.min_frame_duration
    }

    /// Start a new frame and return the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit timestamp. Timestamps earlier
    /// than the previous frame yield a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(self.max_delta)
    }

    /// Smoothed FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Timestamp of the last tick.
    #[must_use]
    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }
}
