//! JSON fetch capability injected into remote parsers.
//!
//! Parsers never talk to the network directly; they receive a [`JsonFetch`]
//! so tests can substitute [`MockJsonFetch`] for the real transport.

pub mod mock;

pub use mock::MockJsonFetch;

use serde_json::Value;

use crate::error::Result;

/// Fetch and decode one JSON document.
pub trait JsonFetch {
    fn fetch_json(&self, url: &str) -> Result<Value>;
}

impl<T: JsonFetch + ?Sized> JsonFetch for &T {
    fn fetch_json(&self, url: &str) -> Result<Value> {
        (**self).fetch_json(url)
    }
}

#[cfg(feature = "http")]
pub use http::UreqFetch;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use serde_json::Value;
    use tracing::{debug, warn};

    use super::JsonFetch;
    use crate::error::{Error, Result};
    use crate::retry::{ExponentialBackoff, RetryStrategy, with_retries};

    /// Blocking HTTP transport.
    pub struct UreqFetch<R: RetryStrategy = ExponentialBackoff> {
        agent: ureq::Agent,
        retry: R,
    }

    impl UreqFetch<ExponentialBackoff> {
        pub fn new(timeout: Duration) -> Self {
            Self::with_retry(timeout, ExponentialBackoff::new())
        }
    }

    impl<R: RetryStrategy> UreqFetch<R> {
        pub fn with_retry(timeout: Duration, retry: R) -> Self {
            let config = ureq::Agent::config_builder()
                .timeout_global(Some(timeout))
                .build();

            Self {
                agent: config.into(),
                retry,
            }
        }

        fn fetch_once(&self, url: &str) -> Result<Value> {
            let mut response = self.agent.get(url).call()?;
            let value = response.body_mut().read_json::<Value>()?;
            Ok(value)
        }
    }

    impl<R: RetryStrategy> JsonFetch for UreqFetch<R> {
        fn fetch_json(&self, url: &str) -> Result<Value> {
            debug!(url, "GET");
            with_retries(&self.retry, |attempt| {
                self.fetch_once(url).inspect_err(|e: &Error| {
                    warn!(url, attempt, "Fetch failed: {}", e);
                })
            })
        }
    }
}
