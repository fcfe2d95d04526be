//! Exponential backoff with jitter.

use std::time::Duration;

/// Jitter amplitude, as a fraction of the capped delay (±25%).
pub const JITTER_FACTOR: f64 = 0.25;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Default upper bound for a single delay, before jitter.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Default growth factor between attempts.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Delay in milliseconds before retrying after `attempt` prior failures.
///
/// `capped = min(initial * multiplier^attempt, max)`, then a uniform jitter of
/// ±25% of `capped` is added and the result floored. Huge exponents saturate
/// to the cap.
///
/// # Example
///
/// ```
/// use plier::retry::backoff_delay;
///
/// let delay = backoff_delay(2, 1000, 10_000, 2.0);
/// assert!((3000..=5000).contains(&delay));
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn backoff_delay(attempt: u32, initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> u64 {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let raw = initial_delay_ms as f64 * multiplier.powi(exponent);
    // 0 * inf
    let capped = if raw.is_nan() {
        0.0
    } else {
        raw.min(max_delay_ms as f64)
    };

    let jitter = capped * JITTER_FACTOR * (fastrand::f64() * 2.0 - 1.0);

    // Float to int casts saturate.
    (capped + jitter).floor().max(0.0) as u64
}

/// Backoff constants used by the retry middleware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap applied before jitter.
    pub max_delay: Duration,
    /// Growth factor between attempts.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl BackoffConfig {
    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Jittered delay before retrying after `attempt` prior failures.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(backoff_delay(
            attempt,
            saturating_millis(self.initial_delay),
            saturating_millis(self.max_delay),
            self.multiplier,
        ))
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
