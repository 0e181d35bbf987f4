use std::time::{Duration, Instant};

/// Sleep is trusted up to this much before the deadline; the remainder yields.
const SPIN_MARGIN: Duration = Duration::from_millis(1);

/// Result of polling the pacer against the current time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pace {
    /// The next deadline has not arrived yet.
    Early { remaining: Duration },
    /// A frame is due. `dropped` counts deadlines skipped to resynchronise.
    Ready { frame: u64, dropped: u64 },
}

/// Fixed-period frame scheduler.
///
/// Deadlines sit at whole multiples of the period measured from construction,
/// so frame timing does not drift with per-frame jitter. A loop that falls
/// more than one period behind skips the missed deadlines instead of
/// rendering them back to back.
#[derive(Debug, Clone)]
pub struct FramePacer {
    start: Instant,
    period_nanos: u64,
    next: u64,
}

impl FramePacer {
    /// Pacer targeting `fps` frames per second (at least 1).
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1) as u64;
        Self::with_period(Duration::from_nanos(1_000_000_000 / fps))
    }

    pub fn with_period(period: Duration) -> Self {
        let period_nanos = u64::try_from(period.as_nanos()).unwrap_or(u64::MAX).max(1);
        Self {
            start: Instant::now(),
            period_nanos,
            next: 1,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        Duration::from_nanos(self.period_nanos)
    }

    /// Time since the pacer was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Milliseconds since the pacer was created.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Offset from start of the next frame deadline.
    #[inline]
    pub fn next_deadline(&self) -> Duration {
        Duration::from_nanos(self.period_nanos.saturating_mul(self.next))
    }

    /// Wall-clock instant of the next frame deadline.
    #[inline]
    pub fn next_instant(&self) -> Instant {
        self.start + self.next_deadline()
    }

    /// Checks `now` (offset from start) against the next deadline and
    /// consumes it if due.
    pub fn poll(&mut self, now: Duration) -> Pace {
        let deadline = self.next_deadline();
        if now < deadline {
            return Pace::Early {
                remaining: deadline - now,
            };
        }

        let reached = u64::try_from(now.as_nanos() / self.period_nanos as u128).unwrap_or(u64::MAX);
        let dropped = reached.saturating_sub(self.next);
        let frame = self.next + dropped;
        self.next = frame.saturating_add(1);

        if dropped > 0 {
            log::debug!("frame pacer behind by {dropped} frame(s); resynchronised");
        }

        Pace::Ready { frame, dropped }
    }

    /// Blocks until the next deadline, then consumes it.
    pub fn wait(&mut self) -> Pace {
        self.sleep_until(self.next_deadline());
        self.poll(self.elapsed())
    }

    pub fn sleep_for(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Blocks until `deadline` (offset from start) has passed.
    ///
    /// Sleeps coarsely to within [`SPIN_MARGIN`], then yields until the
    /// deadline so scheduler granularity does not overshoot it.
    pub fn sleep_until(&self, deadline: Duration) {
        let target = self.start + deadline;
        loop {
            let now = Instant::now();
            if now >= target {
                return;
            }
            let remaining = target - now;
            if remaining > SPIN_MARGIN {
                std::thread::sleep(remaining - SPIN_MARGIN);
            } else {
                std::thread::yield_now();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration { Duration::from_millis(v) }

    fn pacer_10ms() -> FramePacer {
        FramePacer::with_period(ms(10))
    }

    // ── poll ──────────────────────────────────────────────────────────────

    #[test]
    fn poll_before_deadline_is_early() {
        let mut p = pacer_10ms();
        assert_eq!(p.poll(ms(4)), Pace::Early { remaining: ms(6) });
        // Early polls do not consume the deadline.
        assert_eq!(p.next_deadline(), ms(10));
    }

    #[test]
    fn poll_at_deadline_is_ready() {
        let mut p = pacer_10ms();
        assert_eq!(p.poll(ms(10)), Pace::Ready { frame: 1, dropped: 0 });
        assert_eq!(p.next_deadline(), ms(20));
    }

    #[test]
    fn slight_lateness_keeps_schedule() {
        let mut p = pacer_10ms();
        assert_eq!(p.poll(ms(15)), Pace::Ready { frame: 1, dropped: 0 });
        assert_eq!(p.next_deadline(), ms(20));
    }

    #[test]
    fn falling_behind_resynchronises() {
        let mut p = pacer_10ms();
        assert_eq!(p.poll(ms(55)), Pace::Ready { frame: 5, dropped: 4 });
        // Next deadline lies in the future rather than bursting through 2..5.
        assert_eq!(p.next_deadline(), ms(60));
        assert!(matches!(p.poll(ms(56)), Pace::Early { .. }));
    }

    #[test]
    fn consecutive_frames_advance_by_one() {
        let mut p = pacer_10ms();
        for frame in 1..=5 {
            assert_eq!(
                p.poll(ms(frame * 10)),
                Pace::Ready { frame, dropped: 0 }
            );
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn fps_converts_to_period() {
        assert_eq!(FramePacer::new(50).period(), ms(20));
    }

    #[test]
    fn zero_fps_is_clamped() {
        assert_eq!(FramePacer::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn zero_period_is_clamped() {
        assert_eq!(FramePacer::with_period(Duration::ZERO).period(), Duration::from_nanos(1));
    }

    // ── sleeping ──────────────────────────────────────────────────────────

    #[test]
    fn sleep_until_reaches_deadline() {
        let p = pacer_10ms();
        p.sleep_until(ms(3));
        assert!(p.elapsed() >= ms(3));
    }

    #[test]
    fn wait_returns_ready() {
        let mut p = FramePacer::with_period(ms(2));
        assert!(matches!(p.wait(), Pace::Ready { .. }));
        assert!(p.elapsed() >= ms(2));
    }
}
