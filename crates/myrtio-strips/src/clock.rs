//! Time source of the control loop

use embassy_time::{Duration, Instant, Timer};

/// Monotonic clock with async sleep
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> Instant;

    async fn sleep(&mut self, duration: Duration);
}

/// [`Clock`] backed by the embassy time driver
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }
}
