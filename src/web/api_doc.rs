use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::telemetry::ChannelCount;
use crate::telemetry::TelemetrySample;
use crate::upstream::{NearObjectSummary, PositionRecord, WeatherSummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::space::iss_location,
        super::api::space::mars_weather,
        super::api::space::near_objects,
        super::api::telemetry::channel_count,
    ),
    components(
        schemas(
            PositionRecord,
            WeatherSummary,
            NearObjectSummary,
            TelemetrySample,
            ChannelCount,
            ErrorResponse,
        )
    ),
    info(
        title = "Space Relay API",
        description = "Normalized space data feeds and live telemetry. Telemetry is pushed over \
                       the /ws/telemetry WebSocket as `telemetryData` events.",
        version = "0.1.0"
    ),
    tags(
        (name = "space", description = "Upstream space data feeds"),
        (name = "telemetry", description = "Simulated telemetry channels")
    )
)]
pub struct ApiDoc;
