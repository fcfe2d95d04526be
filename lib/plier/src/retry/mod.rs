//! Retry building blocks.
//!
//! - [`retry`] - drives an async task until it succeeds or the policy gives up
//! - [`backoff_delay`] / [`BackoffConfig`] - exponential backoff with jitter
//! - [`sleep`] - a timed wait that a [`CancellationToken`](crate::CancellationToken) can cut short
//!
//! The retry engine owns no policy at all: the `before_retry` callback decides
//! whether to wait, give up, or surface a different error. The retry
//! middleware in [`crate::middleware`] supplies the standard policy.

mod backoff;
mod sleep;

use std::future::Future;

pub use backoff::{
    BackoffConfig, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MULTIPLIER, JITTER_FACTOR,
    backoff_delay,
};
pub use sleep::sleep;

/// Run `task` until it succeeds, consulting `before_retry` after each failure.
///
/// `before_retry` receives the number of failures that happened before the
/// current one (starting at 0) and the error. Returning `Ok(())` schedules
/// another attempt; returning `Err` ends the loop with that error, which need
/// not be the task's error. `before_retry` is never called when the first
/// attempt succeeds, and there is no built-in attempt limit.
///
/// # Example
///
/// ```
/// use plier::retry::retry;
///
/// # async fn run() {
/// let mut calls = 0;
/// let result: Result<u32, String> = retry(
///     || {
///         calls += 1;
///         let outcome = if calls < 3 { Err("flaky".to_string()) } else { Ok(calls) };
///         async move { outcome }
///     },
///     |attempt, error| async move {
///         if attempt < 5 { Ok(()) } else { Err(error) }
///     },
/// )
/// .await;
/// assert_eq!(result, Ok(3));
/// # }
/// ```
pub async fn retry<T, E, F, Fut, B, BFut>(mut task: F, mut before_retry: B) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: FnMut(u32, E) -> BFut,
    BFut: Future<Output = Result<(), E>>,
{
    let mut attempt = 0_u32;
    loop {
        match task().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                before_retry(attempt, error).await?;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
