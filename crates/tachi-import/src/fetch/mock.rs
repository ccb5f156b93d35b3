//! Mock JSON transport for testing
//!
//! Serves canned documents keyed by exact URL and records every request, so
//! tests can assert which pages were (and were not) fetched.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::JsonFetch;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct MockJsonFetch {
    routes: HashMap<String, Value>,
    requested: Mutex<Vec<String>>,
}

impl MockJsonFetch {
    pub fn new<K: Into<String>>(routes: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            routes: routes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Every URL requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl JsonFetch for MockJsonFetch {
    fn fetch_json(&self, url: &str) -> Result<Value> {
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }

        self.routes.get(url).cloned().ok_or(Error::HttpStatus(404))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serves_routes_and_records() {
        let mock = MockJsonFetch::new([("https://a.example/1", json!({ "ok": true }))]);

        assert_eq!(mock.fetch_json("https://a.example/1").unwrap(), json!({ "ok": true }));
        assert!(matches!(
            mock.fetch_json("https://a.example/2"),
            Err(Error::HttpStatus(404))
        ));
        assert_eq!(
            mock.requested_urls(),
            vec!["https://a.example/1", "https://a.example/2"]
        );
    }
}
