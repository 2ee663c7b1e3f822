//! # Deadlines
//!
//! A [`Deadline`] is an absolute point in time by which a call chain must finish. It is created
//! once at the edge of the system (for example when the gateway accepts a request) and handed
//! down to every downstream call, so a single timeout upstream bounds the whole chain.
//!
//! Clients combine the propagated deadline with their own per-call timeout and wait for
//! whichever comes first. When that instant passes the in-flight future is dropped and the
//! caller receives [`FrameworkError::DeadlineExceeded`].

use crate::error::FrameworkError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// An absolute instant after which a call is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn instant(self) -> Instant {
        self.0
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(self) -> bool {
        Instant::now() >= self.0
    }

    /// The earlier of this deadline and `now + timeout`.
    pub fn clamp(self, timeout: Duration) -> Self {
        self.min(Self::after(timeout))
    }
}

/// Resolves the instant a single call must finish by.
pub(crate) fn expiry(deadline: Option<Deadline>, call_timeout: Option<Duration>) -> Option<Instant> {
    match (deadline, call_timeout) {
        (Some(deadline), Some(timeout)) => Some(deadline.clamp(timeout).instant()),
        (Some(deadline), None) => Some(deadline.instant()),
        (None, Some(timeout)) => Some(Deadline::after(timeout).instant()),
        (None, None) => None,
    }
}

/// Drives `exchange` to completion unless `expiry` passes first.
pub(crate) async fn bounded<R, F>(expiry: Option<Instant>, exchange: F) -> Result<R, FrameworkError>
where
    F: Future<Output = Result<R, FrameworkError>>,
{
    match expiry {
        Some(at) => tokio::time::timeout_at(at, exchange)
            .await
            .map_err(|_| FrameworkError::DeadlineExceeded)?,
        None => exchange.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn clamp_picks_the_earlier_instant() {
        let far = Deadline::after(Duration::from_secs(30));
        let clamped = far.clamp(Duration::from_secs(5));
        assert_eq!(clamped.remaining(), Duration::from_secs(5));

        let near = Deadline::after(Duration::from_secs(1));
        assert_eq!(near.clamp(Duration::from_secs(5)), near);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_after_budget() {
        let deadline = Deadline::after(Duration::from_millis(200));
        assert!(!deadline.is_elapsed());
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!(deadline.is_elapsed());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_call_times_out() {
        let at = expiry(None, Some(Duration::from_secs(1)));
        let result: Result<(), _> = bounded(at, std::future::pending()).await;
        assert!(matches!(result, Err(FrameworkError::DeadlineExceeded)));
    }
}
