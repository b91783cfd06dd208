use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TelemetrySample {
    #[serde(serialize_with = "iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub altitude: f64,
    pub velocity: f64,
    pub temperature: f64,
    pub voltage: f64,
    pub battery: f64,
    pub signal: f64,
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
