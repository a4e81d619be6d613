/// One frame's worth of simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStep {
    /// Clamped seconds since the previous frame.
    pub dt: f32,
    /// Accumulated simulated seconds, including this step.
    pub time: f32,
}

/// Clamps a raw elapsed-time sample into `[0, max_step]`.
///
/// Negative samples (clock jumps), NaN, and anything past the ceiling
/// (backgrounded tabs, debugger stalls, `+inf`) never reach the simulation.
#[inline]
pub fn clamp_step(raw_seconds: f32, max_step: f32) -> f32 {
    if raw_seconds.is_nan() {
        return 0.0;
    }
    raw_seconds.clamp(0.0, max_step.max(0.0))
}

/// Frame clock fed by an external monotonic millisecond timestamp.
///
/// The clock does not own a timer: whoever schedules frames passes `now`
/// (`performance.now()` on the web, an `Instant`-derived value natively).
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    elapsed: f32,
    max_step: f32,
}

impl FrameClock {
    /// Creates a clock with no baseline. The first `advance` is treated as an
    /// unbounded gap and yields exactly `max_step`.
    pub fn new(max_step: f32) -> Self {
        Self {
            last_ms: None,
            elapsed: 0.0,
            max_step,
        }
    }

    /// Creates a clock whose baseline is `now_ms`, so the first frame only
    /// advances by the real time since construction.
    pub fn starting_at(now_ms: f64, max_step: f32) -> Self {
        Self {
            last_ms: Some(now_ms),
            elapsed: 0.0,
            max_step,
        }
    }

    /// Advances to `now_ms` and returns the clamped step.
    pub fn advance(&mut self, now_ms: f64) -> FrameStep {
        let dt = match self.last_ms {
            Some(last) => clamp_step(((now_ms - last) / 1000.0) as f32, self.max_step),
            None => self.max_step.max(0.0),
        };
        self.last_ms = Some(now_ms);
        self.elapsed += dt;
        FrameStep {
            dt,
            time: self.elapsed,
        }
    }

    /// Accumulated simulated seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(crate::constants::MAX_STEP_SECONDS)
    }
}
