use tracing::debug;

use crate::clock::Millis;
use crate::timer::{TimerId, TimerQueue};

/// Phase of the looping show/hide cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    Entering,
    Visible,
    Exiting,
    Hidden,
}

impl VisibilityState {
    /// Pure transition function of the four-state cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Entering => Self::Visible,
            Self::Visible => Self::Exiting,
            Self::Exiting => Self::Hidden,
            Self::Hidden => Self::Entering,
        }
    }
}

/// Dwell durations of the looping cycle. All clamped to >= 0 upstream at
/// config resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopTimings {
    pub delay: Millis,
    pub entrance: Millis,
    pub hold: Millis,
    pub exit: Millis,
    pub pause: Millis,
}

impl LoopTimings {
    /// How long the cycle dwells in `state` before the next transition.
    /// The entrance dwell includes the initial delay.
    pub fn dwell(&self, state: VisibilityState) -> Millis {
        match state {
            VisibilityState::Entering => self.delay.saturating_add(self.entrance),
            VisibilityState::Visible => self.hold,
            VisibilityState::Exiting => self.exit,
            VisibilityState::Hidden => self.pause,
        }
    }
}

/// Looping entrance -> visible -> exiting -> hidden cycle.
///
/// Exactly one timer is pending while the loop runs. The cycle counter
/// increments on every wrap back to `Entering`; downstream renderers key
/// re-mounts on it so each iteration replays the entrance animation from
/// its first frame instead of skipping on state re-entry.
#[derive(Debug)]
pub struct VisibilityCycle {
    timings: LoopTimings,
    state: VisibilityState,
    cycle: u64,
    timer: Option<TimerId>,
}

impl VisibilityCycle {
    pub fn new(timings: LoopTimings, queue: &mut TimerQueue, now: Millis) -> Self {
        let mut cycle = Self {
            timings,
            state: VisibilityState::Entering,
            cycle: 0,
            timer: None,
        };
        cycle.arm(queue, now);
        cycle
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// `visible_through_exit` keeps the overlay mounted during `Exiting` so
    /// the exit animation can run (CTA-style overlays).
    pub fn is_visible(&self, visible_through_exit: bool) -> bool {
        match self.state {
            VisibilityState::Entering | VisibilityState::Visible => true,
            VisibilityState::Exiting => visible_through_exit,
            VisibilityState::Hidden => false,
        }
    }

    /// Cancels the pending transition and restarts from `Entering`. Used
    /// when timing parameters change or looping is re-enabled.
    pub fn restart(&mut self, queue: &mut TimerQueue, now: Millis) {
        self.disarm(queue);
        self.state = VisibilityState::Entering;
        self.arm(queue, now);
    }

    pub fn set_timings(&mut self, timings: LoopTimings, queue: &mut TimerQueue, now: Millis) {
        self.timings = timings;
        self.restart(queue, now);
    }

    /// Stops the loop; no further transitions occur until `restart`.
    pub fn stop(&mut self, queue: &mut TimerQueue) {
        self.disarm(queue);
    }

    pub fn tick(&mut self, queue: &mut TimerQueue, now: Millis, fired: &[TimerId]) {
        let Some(id) = self.timer else {
            return;
        };
        if !fired.contains(&id) {
            return;
        }
        self.timer = None;
        let next = self.state.next();
        if next == VisibilityState::Entering {
            self.cycle += 1;
        }
        debug!(state = ?next, cycle = self.cycle, "visibility transition");
        self.state = next;
        self.arm(queue, now);
    }

    fn arm(&mut self, queue: &mut TimerQueue, now: Millis) {
        debug_assert!(self.timer.is_none());
        self.timer = Some(queue.schedule_after(now, self.timings.dwell(self.state)));
    }

    fn disarm(&mut self, queue: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            queue.cancel(id);
        }
    }
}

/// Non-loop variant: a single delayed "should exit" trigger after a
/// configurable duration. Zero disables. Irreversible once fired.
#[derive(Debug)]
pub struct ExitTimer {
    timer: Option<TimerId>,
    should_exit: bool,
}

impl ExitTimer {
    pub fn new(after: Millis, queue: &mut TimerQueue, now: Millis) -> Self {
        let timer = (after > Millis::ZERO).then(|| queue.schedule_after(now, after));
        Self {
            timer,
            should_exit: false,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn tick(&mut self, fired: &[TimerId]) {
        if let Some(id) = self.timer
            && fired.contains(&id)
        {
            self.timer = None;
            self.should_exit = true;
            debug!("auto-exit triggered");
        }
    }

    /// No-op once the exit has fired.
    pub fn cancel(&mut self, queue: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            queue.cancel(id);
        }
    }
}
