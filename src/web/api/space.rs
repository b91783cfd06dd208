use axum::{extract::State, Json};

use crate::upstream::{NearObjectSummary, PositionRecord, WeatherSummary};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse, Feed};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/iss-location",
    responses(
        (status = 200, description = "Current ISS position", body = PositionRecord),
        (status = 500, description = "Position source failed", body = ErrorResponse)
    ),
    tag = "space"
)]
pub async fn iss_location(State(state): State<AppState>) -> ApiResult<Json<PositionRecord>> {
    let record = state
        .adapters
        .position()
        .await
        .map_err(ApiError::from_feed(Feed::IssLocation))?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/mars-weather",
    responses(
        (status = 200, description = "Latest InSight sol summary", body = WeatherSummary),
        (status = 400, description = "NASA API key missing", body = ErrorResponse),
        (status = 404, description = "No sols reported", body = ErrorResponse),
        (status = 500, description = "Weather source failed", body = ErrorResponse)
    ),
    tag = "space"
)]
pub async fn mars_weather(State(state): State<AppState>) -> ApiResult<Json<WeatherSummary>> {
    let summary = state
        .adapters
        .weather()
        .await
        .map_err(ApiError::from_feed(Feed::MarsWeather))?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/neos",
    responses(
        (status = 200, description = "Up to ten soonest close approaches", body = Vec<NearObjectSummary>),
        (status = 400, description = "NASA API key missing", body = ErrorResponse),
        (status = 500, description = "Near-object feed failed", body = ErrorResponse)
    ),
    tag = "space"
)]
pub async fn near_objects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<NearObjectSummary>>> {
    let objects = state
        .adapters
        .near_objects()
        .await
        .map_err(ApiError::from_feed(Feed::NearObjects))?;
    Ok(Json(objects))
}
