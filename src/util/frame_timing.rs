use web_time::Instant;

/// Frame clock measuring the time between ticks and a smoothed FPS.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Last tick timestamp
    last_frame: Instant,
    /// Seconds between the two most recent ticks
    last_delta: f32,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Start the clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            last_delta: 0.0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Mark a frame boundary and return the seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(frame_time);
        frame_time
    }

    /// Seconds between the two most recent ticks.
    #[must_use]
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    fn record(&mut self, frame_time: f32) {
        self.last_delta = frame_time;
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }
}
