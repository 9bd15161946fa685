//! Retry and delay primitives.
//!
//! [`DelayRange`] draws a uniformly random pause between two bounds and is used
//! for every politeness delay in the pipeline. [`attempt_with_backoff`] runs an
//! attempt body up to [`BackoffPolicy::max_attempts`] times, sleeping a random
//! [`DelayRange`] sample between failed attempts.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Upper bound applied to every configured delay, in seconds.
const MAX_DELAY_SECS: f64 = 3600.0;

/// Clamp a configured bound to `[0, MAX_DELAY_SECS]`, mapping NaN and infinities to zero.
fn clamp_secs(secs: f64) -> f64 {
    if secs.is_finite() {
        secs.clamp(0.0, MAX_DELAY_SECS)
    } else {
        0.0
    }
}

/// Inclusive range of seconds from which a pause is drawn uniformly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayRange {
    /// Lower bound in seconds.
    pub min_secs: f64,
    /// Upper bound in seconds.
    pub max_secs: f64,
}

impl DelayRange {
    /// A range that never pauses.
    pub const NONE: Self = Self::new(0.0, 0.0);

    /// Creates a range from bounds in seconds.
    #[must_use]
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Returns the bounds after clamping, with the lower bound first.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        let lo = clamp_secs(self.min_secs);
        let hi = clamp_secs(self.max_secs);
        if lo <= hi { (lo, hi) } else { (hi, lo) }
    }

    /// Returns true if every sample is zero.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.bounds().1 == 0.0
    }

    /// Draws one duration uniformly from the range.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let (lo, hi) = self.bounds();
        if hi <= lo {
            return Duration::from_secs_f64(lo);
        }
        Duration::from_secs_f64(rand::thread_rng().gen_range(lo..=hi))
    }

    /// Sleeps for one sampled duration and returns it.
    pub async fn pause(&self) -> Duration {
        let delay = self.sample();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "Politeness delay");
            sleep(delay).await;
        }
        delay
    }
}

/// Bounded-attempt policy with a randomized delay between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Pause drawn between a failed attempt and the next one.
    pub delay: DelayRange,
}

impl BackoffPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: DelayRange) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Attempts actually spent: `max_attempts`, but never fewer than one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(3, DelayRange::new(3.0, 8.0))
    }
}

/// Result of [`attempt_with_backoff`].
#[derive(Debug)]
pub enum Outcome<T, E> {
    /// An attempt succeeded; no further attempts were made.
    Success {
        /// The accepted value.
        value: T,
        /// Number of attempts issued, including the successful one.
        attempts: u32,
    },
    /// Every attempt failed.
    Exhausted {
        /// The error of the final attempt.
        error: E,
        /// Number of attempts issued.
        attempts: u32,
    },
}

impl<T, E> Outcome<T, E> {
    /// Number of attempts issued.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Returns true if an attempt succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts into a plain `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Exhausted { error, .. } => Err(error),
        }
    }
}

/// Runs `attempt` until it produces a value that `accept` keeps, or the policy is exhausted.
///
/// `attempt` receives the 1-based attempt number. A value rejected by `accept`
/// counts as a failed attempt carrying the error `accept` returned. Between
/// failed attempts a duration drawn from `policy.delay` is slept; no delay
/// follows the final attempt.
pub async fn attempt_with_backoff<T, E, F, Fut, P>(
    policy: &BackoffPolicy,
    label: &str,
    mut attempt: F,
    mut accept: P,
) -> Outcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(T) -> Result<T, E>,
    E: fmt::Display,
{
    let max_attempts = policy.attempts();
    let mut n = 1;

    loop {
        match attempt(n).await.and_then(&mut accept) {
            Ok(value) => {
                debug!(label, attempt = n, "Attempt succeeded");
                return Outcome::Success { value, attempts: n };
            }
            Err(error) if n >= max_attempts => {
                warn!(
                    label,
                    attempts = n,
                    error = %error,
                    "All attempts failed"
                );
                return Outcome::Exhausted { error, attempts: n };
            }
            Err(error) => {
                let delay = policy.delay.sample();
                warn!(
                    label,
                    attempt = n,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Attempt failed, retrying"
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                n += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn immediate(max_attempts: u32) -> BackoffPolicy {
        BackoffPolicy::new(max_attempts, DelayRange::NONE)
    }

    #[test]
    fn test_sample_within_bounds() {
        let range = DelayRange::new(0.01, 0.02);
        for _ in 0..50 {
            let d = range.sample().as_secs_f64();
            assert!((0.01..=0.02).contains(&d));
        }
    }

    #[test]
    fn test_bounds_are_sanitized() {
        assert_eq!(DelayRange::new(5.0, 1.0).bounds(), (1.0, 5.0));
        assert_eq!(DelayRange::new(-3.0, f64::NAN).bounds(), (0.0, 0.0));
        assert!(DelayRange::NONE.is_none());
        assert_eq!(DelayRange::new(2.0, 2.0).sample(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(immediate(0).attempts(), 1);
        assert_eq!(BackoffPolicy::default().attempts(), 3);
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = Cell::new(0u32);
        let outcome = attempt_with_backoff(
            &immediate(5),
            "test",
            |n| {
                calls.set(calls.get() + 1);
                async move { if n < 2 { Err("boom".to_string()) } else { Ok(n) } }
            },
            Ok,
        )
        .await;

        assert_eq!(calls.get(), 2);
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.into_result().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_keeps_last_error() {
        let calls = Cell::new(0u32);
        let outcome: Outcome<(), String> = attempt_with_backoff(
            &immediate(3),
            "test",
            |n| {
                calls.set(calls.get() + 1);
                async move { Err(format!("failure {n}")) }
            },
            Ok,
        )
        .await;

        assert_eq!(calls.get(), 3);
        assert!(!outcome.is_success());
        match outcome {
            Outcome::Exhausted { error, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(error, "failure 3");
            }
            Outcome::Success { .. } => panic!("expected exhaustion"),
        }
    }

    #[tokio::test]
    async fn test_rejected_value_is_retried() {
        let accepted = Cell::new(0u32);
        let outcome = attempt_with_backoff(
            &immediate(3),
            "test",
            |n| async move { Ok::<u32, String>(n) },
            |n| {
                accepted.set(accepted.get() + 1);
                if n == 3 { Ok(n) } else { Err(format!("rejected {n}")) }
            },
        )
        .await;

        assert_eq!(accepted.get(), 3);
        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
    }

    #[tokio::test]
    async fn test_delay_between_attempts_not_after_last() {
        use std::cell::RefCell;
        use std::time::Instant;

        let pause = Duration::from_millis(200);
        let started = RefCell::new(Vec::new());
        let outcome: Outcome<(), String> = attempt_with_backoff(
            &BackoffPolicy::new(3, DelayRange::new(0.2, 0.2)),
            "test",
            |n| {
                started.borrow_mut().push(Instant::now());
                async move { Err(format!("failure {n}")) }
            },
            Ok,
        )
        .await;
        let finished = Instant::now();

        assert_eq!(outcome.attempts(), 3);
        let started = started.into_inner();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= pause - Duration::from_millis(5));
        }
        assert!(finished - started[2] < pause);
    }
}
