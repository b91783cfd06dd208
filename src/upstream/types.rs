use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Sentinel emitted in place of a sensor reading the upstream did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Current position of the tracked object (degrees, degrees, km, km/h).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PositionRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daynum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// A single averaged sensor value, or the `"N/A"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    NotAvailable,
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::NotAvailable, Reading::Value)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => serializer.serialize_f64(*v),
            Reading::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherSummary {
    pub sol: String,
    #[schema(value_type = Object)]
    pub avg_temp: Reading,
    #[schema(value_type = Object)]
    pub pressure: Reading,
    #[schema(value_type = Object)]
    pub wind_speed: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NearObjectSummary {
    pub id: String,
    pub name: String,
    pub close_approach_date: String,
    pub miss_distance_km: f64,
    pub estimated_diameter_m: f64,
    pub is_potentially_hazardous: bool,
}
