use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::client::UpstreamClient;
use super::credential::Credential;
use super::error::FetchError;

pub const DEFAULT_POSITION_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";
pub const DEFAULT_WEATHER_URL: &str = "https://api.nasa.gov/insight_weather/";
pub const DEFAULT_NEO_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub position: String,
    pub weather: String,
    pub neo_feed: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION_URL.to_string(),
            weather: DEFAULT_WEATHER_URL.to_string(),
            neo_feed: DEFAULT_NEO_FEED_URL.to_string(),
        }
    }
}

/// The three upstream adapters, sharing one client, credential and timeout.
///
/// Each adapter lives in its own module (`position`, `weather`, `neo`) as an
/// `impl Adapters` block.
#[derive(Clone)]
pub struct Adapters {
    pub(super) client: Arc<dyn UpstreamClient>,
    pub(super) endpoints: Endpoints,
    pub(super) credential: Credential,
    timeout: Option<Duration>,
}

impl Adapters {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        endpoints: Endpoints,
        credential: Credential,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            endpoints,
            credential,
            timeout,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// One outbound call. A `None` timeout waits on the upstream indefinitely.
    pub(super) async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let call = self.client.get_json(url, query);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                FetchError::Upstream(format!(
                    "no response from {} within {}",
                    url,
                    humantime::format_duration(limit)
                ))
            })?,
            None => call.await,
        }
    }
}
