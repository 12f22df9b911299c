use std::time::Instant;

/// Longest frame delta handed to per-frame logic, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame clock for the runner.
///
/// [`tick`](Self::tick) yields the seconds since the previous tick, capped at
/// [`MAX_FRAME_DELTA`] so a stalled frame (window drag, debugger) does not
/// launch the fades, springs and physics forward.
pub struct Timer {
    last_update: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
        }
    }

    /// Advances the clock and returns the capped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        delta.as_secs_f32().min(MAX_FRAME_DELTA)
    }
}
