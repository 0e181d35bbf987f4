use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

/// Timing of one frame, as seen by `App::on_frame`.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped to the clock's range.
    pub dt: f32,
    pub now: Instant,
    /// Starts at 0 and wraps on overflow.
    pub frame_index: u64,
}

/// Measures the delta between consecutive frames.
///
/// The delta is clamped so a stall (debugger, minimized window, slow
/// resize) does not hand the simulation one huge step, and a tight loop
/// never reports zero.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frames: u64,
    dt_range: RangeInclusive<Duration>,
}

impl FrameClock {
    /// Clamps `dt` to 0.1ms..=250ms.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frames: 0,
            dt_range: dt_min..=dt_max,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(*self.dt_range.start(), *self.dt_range.end());
        self.last = now;

        let frame_index = self.frames;
        self.frames = self.frames.wrapping_add(1);

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
