use async_trait::async_trait;
use serde_json::Value;

use super::error::FetchError;

/// Raw JSON access to an upstream HTTP API.
///
/// Adapters only ever talk to upstreams through this trait, so tests can
/// substitute a double and count outbound calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

#[derive(Default)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        log::debug!("GET {} returned {} bytes", url, bytes.len());

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Serves canned JSON per URL and records every call.
    #[derive(Default)]
    pub struct StubClient {
        responses: HashMap<String, Value>,
        calls: AtomicUsize,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl StubClient {
        pub fn with(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_query(&self) -> Vec<(String, String)> {
            self.queries
                .lock()
                .unwrap()
                .last()
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl UpstreamClient for StubClient {
        async fn get_json(
            &self,
            url: &str,
            query: &[(&str, String)],
        ) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            );
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Upstream(format!("404 Not Found for {url}")))
        }
    }

    /// Never answers, like an upstream that accepted the connection and hung.
    pub struct HangingClient;

    #[async_trait]
    impl UpstreamClient for HangingClient {
        async fn get_json(
            &self,
            _url: &str,
            _query: &[(&str, String)],
        ) -> Result<Value, FetchError> {
            std::future::pending().await
        }
    }
}
