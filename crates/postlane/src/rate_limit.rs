//! Token-bucket rate limiter shared by all calls of one client.
//!
//! The bucket refills at `R` tokens per second and holds at most `2R`, so a
//! burst of up to `2R` calls passes immediately and the long-run rate stays at
//! `R`. Waiters are not queued: whichever waiter wakes and finds a token first
//! takes it.

use crate::context::Context;
use crate::error::Interrupted;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Thread-safe token bucket.
#[derive(Debug)]
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket admitting `per_second` calls per second with a
    /// burst of twice that. A rate of zero is treated as one.
    #[must_use]
    pub fn new(per_second: u32) -> Self {
        let rate = f64::from(per_second.max(1));
        let capacity = rate * 2.0;
        Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Sustained rate in tokens per second.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Burst capacity.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Takes a token if one is available.
    ///
    /// # Errors
    ///
    /// Returns the time until the next token when the bucket is empty.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - state.tokens;
            Err(Duration::from_secs_f64(missing / self.rate))
        }
    }

    /// Waits until a token is available.
    pub async fn acquire(&self) {
        while let Err(wait) = self.try_acquire() {
            trace!(?wait, "rate limiter waiting");
            tokio::time::sleep(wait).await;
        }
    }

    /// Waits for a token unless `ctx` ends first.
    ///
    /// # Errors
    ///
    /// Returns why the context ended if it ended before a token was taken.
    pub async fn acquire_with(&self, ctx: &Context) -> Result<(), Interrupted> {
        if let Some(reason) = ctx.interruption() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            () = self.acquire() => Ok(()),
        }
    }
}
