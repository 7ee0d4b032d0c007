use std::time::{Duration, Instant};

use auto_impl::auto_impl;

/// Source of the elapsed time fed to the controller.
#[auto_impl(&, Box)]
pub trait Clock {
    /// Time since the loop started.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time since [`MonotonicClock::start`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
