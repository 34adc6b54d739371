//! Frame timing budget

use embassy_time::Duration;

/// Frame interval while animating
pub const ANIMATING_INTERVAL: Duration = Duration::from_millis(75);

/// Poll interval while idle
pub const IDLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Target duration of one control loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingBudget {
    animating: Duration,
    idle: Duration,
}

impl TimingBudget {
    pub const fn new() -> Self {
        Self {
            animating: ANIMATING_INTERVAL,
            idle: IDLE_INTERVAL,
        }
    }

    #[must_use]
    pub const fn with_animating(mut self, interval: Duration) -> Self {
        self.animating = interval;
        self
    }

    #[must_use]
    pub const fn with_idle(mut self, interval: Duration) -> Self {
        self.idle = interval;
        self
    }

    /// Interval that applies in the given state
    pub fn target(&self, animating: bool) -> Duration {
        if animating { self.animating } else { self.idle }
    }

    /// Time left to sleep after `elapsed` of work. Overruns yield zero.
    pub fn residual(target: Duration, elapsed: Duration) -> Duration {
        target.checked_sub(elapsed).unwrap_or(Duration::MIN)
    }
}

impl Default for TimingBudget {
    fn default() -> Self {
        Self::new()
    }
}
