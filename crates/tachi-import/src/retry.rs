//! Retry policy for remote page fetches.
//!
//! The lazy page iterator never retries on its own; [`crate::fetch::UreqFetch`]
//! repeats a single request through [`with_retries`]. Only failures that can
//! plausibly go away are repeated: connection problems, timeouts, 429 and 5xx.
//! Other 4xx responses and undecodable bodies are returned at once.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::retry as retry_config;

/// How long to wait before repeating a failed request.
pub trait RetryStrategy {
    /// Delay after failed attempt `attempt` (0-indexed), or `None` to give up.
    fn backoff(&self, attempt: u32) -> Option<Duration>;
}

impl<S: RetryStrategy + ?Sized> RetryStrategy for &S {
    fn backoff(&self, attempt: u32) -> Option<Duration> {
        (**self).backoff(attempt)
    }
}

/// Up to `MAX_FETCH_ATTEMPTS` attempts, waiting `RETRY_DELAYS_MS` in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialBackoff;

impl ExponentialBackoff {
    pub fn new() -> Self {
        Self
    }
}

impl RetryStrategy for ExponentialBackoff {
    fn backoff(&self, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= retry_config::MAX_FETCH_ATTEMPTS {
            return None;
        }
        retry_config::RETRY_DELAYS_MS
            .get(attempt as usize)
            .map(|&ms| Duration::from_millis(ms))
    }
}

/// Single attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn backoff(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}

/// Run `fetch` until it succeeds, fails with a non-retryable error, or
/// `strategy` gives up. The last error is returned.
pub fn with_retries<T, S, F>(strategy: &S, mut fetch: F) -> Result<T>
where
    S: RetryStrategy + ?Sized,
    F: FnMut(u32) -> Result<T>,
{
    let mut attempt = 0;
    loop {
        let err = match fetch(attempt) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let Some(delay) = strategy.backoff(attempt).filter(|_| err.is_retryable()) else {
            return Err(err);
        };

        debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying fetch");
        thread::sleep(delay);
        attempt += 1;
    }
}

impl Error {
    /// Whether repeating the request that produced this error may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::HttpStatus(code) => *code == 429 || *code >= 500,
            Error::Http(_) | Error::Io(_) => true,
            _ => false,
        }
    }
}
