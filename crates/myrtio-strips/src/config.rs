//! Supervisor configuration

use embassy_time::Duration;

use crate::budget::TimingBudget;

/// Delay between a fault and the next connection attempt
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Tunables of the [`Supervisor`](crate::Supervisor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub budget: TimingBudget,
    pub retry_delay: Duration,
    /// Publish the status topic as a retained message
    pub status_retain: bool,
}

impl SupervisorConfig {
    pub const fn new() -> Self {
        Self {
            budget: TimingBudget::new(),
            retry_delay: DEFAULT_RETRY_DELAY,
            status_retain: false,
        }
    }

    #[must_use]
    pub const fn with_budget(mut self, budget: TimingBudget) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    #[must_use]
    pub const fn with_status_retain(mut self, status_retain: bool) -> Self {
        self.status_retain = status_retain;
        self
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self::new()
    }
}
