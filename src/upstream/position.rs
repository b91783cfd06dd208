use serde::Deserialize;

use super::adapters::Adapters;
use super::error::FetchError;
use super::types::PositionRecord;

/// Satellite position as reported by the position API.
#[derive(Debug, Deserialize)]
struct SatellitePosition {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    velocity: f64,
    name: Option<String>,
    id: Option<u64>,
    visibility: Option<String>,
    footprint: Option<f64>,
    timestamp: Option<i64>,
    daynum: Option<f64>,
    solar_lat: Option<f64>,
    solar_lon: Option<f64>,
    units: Option<String>,
}

impl From<SatellitePosition> for PositionRecord {
    fn from(p: SatellitePosition) -> Self {
        PositionRecord {
            latitude: p.latitude,
            longitude: p.longitude,
            altitude: p.altitude,
            velocity: p.velocity,
            name: p.name,
            id: p.id,
            visibility: p.visibility,
            footprint: p.footprint,
            timestamp: p.timestamp,
            daynum: p.daynum,
            solar_lat: p.solar_lat,
            solar_lon: p.solar_lon,
            units: p.units,
        }
    }
}

impl Adapters {
    pub async fn position(&self) -> Result<PositionRecord, FetchError> {
        let body = self.get(&self.endpoints.position, &[]).await?;
        let position: SatellitePosition = serde_json::from_value(body)?;
        Ok(position.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::upstream::adapters::{Endpoints, DEFAULT_POSITION_URL};
    use crate::upstream::client::testing::StubClient;
    use crate::upstream::credential::Credential;

    use super::*;

    #[tokio::test]
    async fn maps_position_without_credential() {
        let stub = Arc::new(StubClient::default().with(
            DEFAULT_POSITION_URL,
            json!({
                "name": "iss",
                "id": 25544,
                "latitude": 50.11,
                "longitude": 118.07,
                "altitude": 408.05,
                "velocity": 27623.61,
                "visibility": "daylight",
                "footprint": 4446.5,
                "timestamp": 1364069476,
                "daynum": 2456375.3411574,
                "solar_lat": 1.3327003598701,
                "solar_lon": 238.78610691196,
                "units": "kilometers"
            }),
        ));
        let adapters = Adapters::new(stub.clone(), Endpoints::default(), Credential::default(), None);

        let record = adapters.position().await.unwrap();
        assert_eq!(record.latitude, 50.11);
        assert_eq!(record.longitude, 118.07);
        assert_eq!(record.altitude, 408.05);
        assert_eq!(record.velocity, 27623.61);
        assert_eq!(record.id, Some(25544));
        assert_eq!(record.daynum, Some(2456375.3411574));
        assert_eq!(record.solar_lat, Some(1.3327003598701));
        assert_eq!(record.solar_lon, Some(238.78610691196));
        assert_eq!(record.units.as_deref(), Some("kilometers"));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn bare_position_has_no_extras() {
        let stub = Arc::new(StubClient::default().with(
            DEFAULT_POSITION_URL,
            json!({"latitude": -3.5, "longitude": 12.0, "altitude": 415.2, "velocity": 27580.4}),
        ));
        let adapters = Adapters::new(stub, Endpoints::default(), Credential::default(), None);

        let record = adapters.position().await.unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"latitude": -3.5, "longitude": 12.0, "altitude": 415.2, "velocity": 27580.4})
        );
    }

    #[tokio::test]
    async fn transport_failure_is_upstream_error() {
        let stub = Arc::new(StubClient::default());
        let adapters = Adapters::new(stub, Endpoints::default(), Credential::default(), None);

        let err = adapters.position().await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream(_)));
    }
}
