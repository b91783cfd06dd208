use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::channels::DEFAULT_PERIOD;
use crate::upstream::{Adapters, Credential, Endpoints, HttpClient};

pub const API_KEY_ENV: &str = "NASA_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub upstream: UpstreamConfig,
    pub nasa: NasaConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_position_url")]
    pub position_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_neo_feed_url")]
    pub neo_feed_url: String,
    /// `null` waits on upstreams indefinitely.
    #[serde(default = "default_timeout", deserialize_with = "optional_duration")]
    pub timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            position_url: default_position_url(),
            weather_url: default_weather_url(),
            neo_feed_url: default_neo_feed_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_position_url() -> String {
    Endpoints::default().position
}

fn default_weather_url() -> String {
    Endpoints::default().weather
}

fn default_neo_feed_url() -> String {
    Endpoints::default().neo_feed
}

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(10))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NasaConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_period", deserialize_with = "duration")]
    pub period: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
        }
    }
}

fn default_period() -> Duration {
    DEFAULT_PERIOD
}

fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

fn optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom))
        .transpose()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file if one is given, otherwise starts from defaults, then
    /// applies the `NASA_API_KEY` environment override.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.nasa.api_key = Some(key);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.period.is_zero() {
            return Err(ConfigError::Invalid(
                "telemetry.period must be greater than zero".into(),
            ));
        }
        if self.upstream.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid(
                "upstream.timeout must be greater than zero or null".into(),
            ));
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            position: self.upstream.position_url.clone(),
            weather: self.upstream.weather_url.clone(),
            neo_feed: self.upstream.neo_feed_url.clone(),
        }
    }

    pub fn adapters(&self) -> Adapters {
        Adapters::new(
            Arc::new(HttpClient::new()),
            self.endpoints(),
            Credential::new(self.nasa.api_key.clone()),
            self.upstream.timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();

        assert_eq!(config.web.bind, "0.0.0.0:3001");
        assert_eq!(config.telemetry.period, Duration::from_secs(1));
        assert_eq!(config.upstream.timeout, Some(Duration::from_secs(10)));
        assert!(config.nasa.api_key.is_none());
        assert_eq!(config.endpoints().position, Endpoints::default().position);
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_yaml(
            r#"
web:
  bind: 127.0.0.1:9000
upstream:
  position_url: http://localhost:1234/iss
  timeout: 2s 500ms
nasa:
  api_key: DEMO_KEY
telemetry:
  period: 250ms
"#,
        )
        .unwrap();

        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.upstream.position_url, "http://localhost:1234/iss");
        assert_eq!(config.upstream.timeout, Some(Duration::from_millis(2_500)));
        assert_eq!(config.nasa.api_key.as_deref(), Some("DEMO_KEY"));
        assert_eq!(config.telemetry.period, Duration::from_millis(250));
    }

    #[test]
    fn null_timeout_disables_it() {
        let config = Config::from_yaml("upstream:\n  timeout: null\n").unwrap();
        assert_eq!(config.upstream.timeout, None);
    }

    #[test]
    fn rejects_zero_period() {
        let err = Config::from_yaml("telemetry:\n  period: 0s\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unparseable_duration() {
        let err = Config::from_yaml("telemetry:\n  period: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn environment_key_overrides_file() {
        let config = Config::from_yaml("nasa:\n  api_key: FROM_FILE\n")
            .unwrap()
            .with_api_key_override(Some("FROM_ENV".into()));
        assert_eq!(config.nasa.api_key.as_deref(), Some("FROM_ENV"));

        let kept = Config::default()
            .with_api_key_override(Some("  ".into()))
            .with_api_key_override(None);
        assert!(kept.nasa.api_key.is_none());
    }
}
