use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

use super::adapters::Adapters;
use super::error::FetchError;
use super::types::{Reading, WeatherSummary};

/// InSight weather feed: `sol_keys` lists the reported sols, and each sol id
/// is also a top-level key holding that sol's sensor summaries.
#[derive(Debug, Deserialize)]
struct InsightFeed {
    #[serde(default)]
    sol_keys: Option<Vec<String>>,
    #[serde(flatten)]
    sols: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct SolReport {
    #[serde(rename = "AT", default, deserialize_with = "lenient")]
    temperature: Option<SensorSummary>,
    #[serde(rename = "PRE", default, deserialize_with = "lenient")]
    pressure: Option<SensorSummary>,
    #[serde(rename = "HWS", default, deserialize_with = "lenient")]
    wind_speed: Option<SensorSummary>,
}

#[derive(Debug, Deserialize)]
struct SensorSummary {
    #[serde(default, deserialize_with = "lenient")]
    av: Option<f64>,
}

/// Reads a field that may be absent or of the wrong shape; either way it is `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn average(sensor: Option<SensorSummary>) -> Reading {
    sensor.and_then(|s| s.av).into()
}

fn summarize(feed: InsightFeed) -> Result<WeatherSummary, FetchError> {
    let InsightFeed { sol_keys, mut sols } = feed;

    let sol = sol_keys
        .and_then(|keys| keys.into_iter().last())
        .ok_or(FetchError::NoData("no sols reported by InSight"))?;

    // A sol entry that is missing or not an object degrades to all-N/A.
    let report: SolReport = sols
        .remove(&sol)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    Ok(WeatherSummary {
        sol,
        avg_temp: average(report.temperature),
        pressure: average(report.pressure),
        wind_speed: average(report.wind_speed),
    })
}

impl Adapters {
    pub async fn weather(&self) -> Result<WeatherSummary, FetchError> {
        let key = self.credential.require()?;
        let query = [
            ("api_key", key.to_string()),
            ("feedtype", "json".to_string()),
            ("ver", "1.0".to_string()),
        ];

        let body = self.get(&self.endpoints.weather, &query).await?;
        summarize(serde_json::from_value(body)?)
    }
}
