use jiff::{SignedDuration, Timestamp};
use std::time::{Duration, Instant};

/// Longest single sleep while waiting for a target time.
const MAX_SLEEP_SLICE: Duration = Duration::from_millis(1);

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block and wait until the clock reaches the target time.
    fn wait_until(&self, target: Timestamp);
}

/// Wall clock. NTP corrections and VM migrations can move it backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp) {
        sleep_until(|| self.now(), target);
    }
}

/// Wall time captured once at construction, advanced by [`Instant`].
///
/// Never moves backwards within a process, but drifts from the wall clock
/// if the system time is corrected after startup.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Timestamp,
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Timestamp::now(),
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        SignedDuration::try_from(self.start.elapsed())
            .ok()
            .and_then(|elapsed| self.origin.checked_add(elapsed).ok())
            .unwrap_or(Timestamp::MAX)
    }

    fn wait_until(&self, target: Timestamp) {
        sleep_until(|| self.now(), target);
    }
}

fn sleep_until(now: impl Fn() -> Timestamp, target: Timestamp) {
    // Re-check after every sleep: wakeups can be early and the wall clock
    // can jump while we sleep.
    loop {
        let current = now();
        if current >= target {
            return;
        }
        let remaining = target.duration_since(current).unsigned_abs();
        std::thread::sleep(remaining.min(MAX_SLEEP_SLICE));
    }
}

/// Turns a [`Clock`] into integer ticks counted from a base time.
#[derive(Debug, Clone)]
pub struct TickClock<C> {
    clock: C,
    base_time: Timestamp,
    time_unit_millis: i64,
}

impl<C: Clock> TickClock<C> {
    pub fn new(clock: C, base_time: Timestamp, time_unit_millis: u32) -> Self {
        Self {
            clock,
            base_time,
            time_unit_millis: i64::from(time_unit_millis.max(1)),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// `floor((now - base_time) / time_unit)`; negative before the base time.
    pub fn current_tick(&self) -> i64 {
        let elapsed = self.clock.now().duration_since(self.base_time).as_millis();
        let tick = elapsed.div_euclid(i128::from(self.time_unit_millis));
        tick.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Blocks until the tick moves past `after` and returns the first tick
    /// observed beyond it.
    pub fn next_tick(&self, after: i64) -> i64 {
        loop {
            if let Some(target) = self.timestamp_of(after.saturating_add(1)) {
                self.clock.wait_until(target);
            }
            let tick = self.current_tick();
            if tick > after {
                return tick;
            }
            std::hint::spin_loop();
        }
    }

    /// Wall time at which `tick` begins, if it is representable.
    pub fn timestamp_of(&self, tick: i64) -> Option<Timestamp> {
        let millis = tick.checked_mul(self.time_unit_millis)?;
        self.base_time
            .checked_add(SignedDuration::from_millis(millis))
            .ok()
    }
}
