use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::adapters::Adapters;
use super::error::FetchError;
use super::types::NearObjectSummary;

pub const MAX_NEAR_OBJECTS: usize = 10;

/// NeoWs feed: objects grouped under their approach date, walked in date order.
#[derive(Debug, Deserialize)]
struct NeoFeed {
    near_earth_objects: BTreeMap<String, Vec<NeoEntry>>,
}

#[derive(Debug, Deserialize)]
struct NeoEntry {
    id: String,
    name: String,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: EstimatedDiameter,
    close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    meters: DiameterRange,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct CloseApproach {
    close_approach_date: Option<String>,
    close_approach_date_full: Option<String>,
    miss_distance: MissDistance,
}

#[derive(Debug, Deserialize)]
struct MissDistance {
    kilometers: Number,
}

/// NeoWs encodes distances as strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    fn value(&self) -> Result<f64, FetchError> {
        match self {
            Number::Float(v) => Ok(*v),
            Number::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| FetchError::Malformed(format!("invalid distance {s:?}"))),
        }
    }
}

fn round0(value: f64) -> f64 {
    value.round()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses both `2024-Jan-01 12:30` (full) and `2024-01-01` approach dates.
fn approach_time(date: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date, "%Y-%b-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn summarize_entry(entry: NeoEntry) -> Result<NearObjectSummary, FetchError> {
    let approach = entry.close_approach_data.first().ok_or_else(|| {
        FetchError::Malformed(format!("object {} has no close approach data", entry.id))
    })?;

    let close_approach_date = approach
        .close_approach_date_full
        .clone()
        .or_else(|| approach.close_approach_date.clone())
        .ok_or_else(|| {
            FetchError::Malformed(format!("object {} has no approach date", entry.id))
        })?;

    let range = &entry.estimated_diameter.meters;
    let diameter = (range.estimated_diameter_min + range.estimated_diameter_max) / 2.0;

    Ok(NearObjectSummary {
        id: entry.id,
        name: entry.name,
        close_approach_date,
        miss_distance_km: round0(approach.miss_distance.kilometers.value()?),
        estimated_diameter_m: round2(diameter),
        is_potentially_hazardous: entry.is_potentially_hazardous_asteroid,
    })
}

/// Flattens every date group, sorts by approach time and keeps the soonest.
fn summarize(feed: NeoFeed) -> Result<Vec<NearObjectSummary>, FetchError> {
    let mut objects = feed
        .near_earth_objects
        .into_values()
        .flatten()
        .map(summarize_entry)
        .collect::<Result<Vec<_>, _>>()?;

    // Unparseable dates sort after every dated entry.
    objects.sort_by_cached_key(|o| {
        let time = approach_time(&o.close_approach_date);
        (time.is_none(), time)
    });
    objects.truncate(MAX_NEAR_OBJECTS);

    Ok(objects)
}

impl Adapters {
    pub async fn near_objects(&self) -> Result<Vec<NearObjectSummary>, FetchError> {
        self.near_objects_from(Utc::now().date_naive()).await
    }

    pub async fn near_objects_from(
        &self,
        start: NaiveDate,
    ) -> Result<Vec<NearObjectSummary>, FetchError> {
        let key = self.credential.require()?;
        let query = [
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("api_key", key.to_string()),
        ];

        let body = self.get(&self.endpoints.neo_feed, &query).await?;
        summarize(serde_json::from_value(body)?)
    }
}
