use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the loop is slowed down to approximate real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PacingMode {
    /// Sleep a fixed delay after every tick.
    #[default]
    FixedDelay,
    /// Keep every tick at least one period long.
    Deadline,
}

impl std::str::FromStr for PacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed-delay" => Ok(Self::FixedDelay),
            "deadline" => Ok(Self::Deadline),
            _ => Err(format!(
                "unknown pacing {s:?} (expected \"fixed-delay\" or \"deadline\")"
            )),
        }
    }
}

/// Per-tick rate limiting.
///
/// Neither mode compensates for drift between wall-clock pacing and simulated
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    FixedDelay(Duration),
    Deadline(Duration),
}

impl Pacing {
    pub fn new(mode: PacingMode, period: Duration) -> Self {
        match mode {
            PacingMode::FixedDelay => Self::FixedDelay(period),
            PacingMode::Deadline => Self::Deadline(period),
        }
    }

    pub fn period(&self) -> Duration {
        match self {
            Self::FixedDelay(period) | Self::Deadline(period) => *period,
        }
    }

    /// Arms the pacing for one tick. The returned guard sleeps when dropped.
    ///
    /// # Example
    /// ```
    /// use std::time::{Duration, Instant};
    /// use openarm_control::Pacing;
    ///
    /// let now = Instant::now();
    /// {
    ///     // Do not use `let _ = ..` here because it immediately drops the guard.
    ///     let _guard = Pacing::Deadline(Duration::from_millis(50)).begin_tick();
    ///     assert!(now.elapsed() < Duration::from_millis(20));
    /// }
    /// assert!(now.elapsed() >= Duration::from_millis(50));
    /// ```
    pub fn begin_tick(&self) -> TickGuard {
        match *self {
            Self::FixedDelay(delay) => TickGuard::Delay(delay),
            Self::Deadline(period) => TickGuard::Until(Instant::now() + period),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::FixedDelay(Duration::from_secs_f64(1.0 / 240.0))
    }
}

/// RAII sleep for the end of a tick.
#[must_use = "the guard sleeps when it is dropped"]
#[derive(Debug)]
pub enum TickGuard {
    Delay(Duration),
    Until(Instant),
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        match *self {
            Self::Delay(delay) => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
            Self::Until(target_time) => {
                let now = Instant::now();
                if now < target_time {
                    std::thread::sleep(target_time - now);
                }
            }
        }
    }
}
