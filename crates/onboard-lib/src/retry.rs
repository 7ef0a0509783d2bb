//! Exponential backoff schedule for inventory API calls

use std::time::Duration;

/// Default number of attempts per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry budget applied to transport failures and 429 responses
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the first retry
    pub initial_interval: Duration,
    /// Growth factor between consecutive waits
    pub multiplier: f64,
    /// Upper bound for a single wait
    pub max_interval: Duration,
    /// Upper bound for the whole call, waits included
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_interval: Duration::from_millis(100),
            multiplier: 1.5,
            max_interval: Duration::from_millis(500),
            max_elapsed: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Default schedule with a custom attempt count
    pub fn with_max_attempts(attempts: u32) -> Self {
        Self {
            max_attempts: attempts.max(1),
            ..Default::default()
        }
    }

    /// Start a fresh schedule for one logical call
    pub fn backoff(&self) -> Backoff {
        Backoff {
            current: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: self.multiplier,
        }
    }

    /// Whether another attempt is allowed after `attempt` failed,
    /// given the time already spent and the wait that would follow
    pub fn allows_retry(&self, attempt: u32, elapsed: Duration, next_delay: Duration) -> bool {
        attempt < self.max_attempts && elapsed + next_delay <= self.max_elapsed
    }
}

/// Stateful wait sequence: each call grows the interval until the cap
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max_interval: Duration,
    multiplier: f64,
}

impl Backoff {
    /// Wait to use now; advances the schedule
    pub fn next_delay(&mut self) -> Duration {
        let delay = std::cmp::min(self.current, self.max_interval);
        let grown = Duration::from_secs_f64(self.current.as_secs_f64() * self.multiplier);
        self.current = std::cmp::min(grown, self.max_interval);
        delay
    }
}
