use std::cell::Cell;
use std::time::Instant;

/// Milliseconds on the shared animation timeline.
///
/// All discrete timers and continuous effects derive from one of these, so a
/// single clock read per frame keeps every effect in phase.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    /// Converts a duration in seconds, clamping negatives to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((secs * 1000.0).round() as u64)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn scaled(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

/// Progress fraction in `[0, 1)` of `now` through a repeating period.
///
/// Stateless: a missed frame yields the mathematically correct progress for
/// whatever instant is sampled next, so backgrounded instances never drift.
pub fn progress(now: Millis, period: Millis) -> f64 {
    let period = period.0.max(1);
    (now.0 % period) as f64 / period as f64
}

/// Per-frame time source all animation state derives from.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock measured from construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u64)
    }
}

/// Hand-driven clock for tests and offline sampling.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now.0);
    }

    pub fn advance(&self, by: Millis) {
        self.now.set(self.now.get().saturating_add(by.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_secs_clamps_negative_and_non_finite() {
        assert_eq!(Millis::from_secs_f64(-2.0), Millis::ZERO);
        assert_eq!(Millis::from_secs_f64(f64::NAN), Millis::ZERO);
        assert_eq!(Millis::from_secs_f64(1.5), Millis(1500));
    }

    #[test]
    fn progress_wraps_each_period() {
        let period = Millis(4000);
        assert_eq!(progress(Millis(0), period), 0.0);
        assert_eq!(progress(Millis(1000), period), 0.25);
        assert_eq!(progress(Millis(4000), period), 0.0);
        assert_eq!(progress(Millis(5000), period), 0.25);
    }

    #[test]
    fn progress_survives_zero_period() {
        assert_eq!(progress(Millis(123), Millis(0)), 0.0);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(Millis(10));
        clock.advance(Millis(5));
        assert_eq!(clock.now(), Millis(15));
        clock.set(Millis(100));
        assert_eq!(clock.now(), Millis(100));
    }
}
