use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::upstream::FetchError;

/// Upstream feed a request was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Feed {
    #[strum(serialize = "ISS location")]
    IssLocation,
    #[strum(serialize = "Mars weather")]
    MarsWeather,
    #[strum(serialize = "NEO")]
    NearObjects,
}

impl Feed {
    fn failure_message(self) -> &'static str {
        match self {
            Feed::IssLocation => "Error fetching ISS location",
            Feed::MarsWeather => "Error fetching Mars weather data. Check your API key.",
            Feed::NearObjects => "Error fetching NEO data. Check your API key.",
        }
    }
}

const MISSING_KEY_MESSAGE: &str =
    "NASA API key is missing or invalid. Please check your .env file.";
const NO_WEATHER_MESSAGE: &str = "No weather data available from InSight.";

#[derive(Debug)]
pub struct ApiError {
    feed: Feed,
    error: FetchError,
}

impl ApiError {
    /// Tags a fetch failure with the feed it came from, for `map_err`.
    pub fn from_feed(feed: Feed) -> impl FnOnce(FetchError) -> ApiError {
        move |error| ApiError { feed, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.error {
            FetchError::MissingCredential => (StatusCode::BAD_REQUEST, MISSING_KEY_MESSAGE),
            FetchError::NoData(_) => (StatusCode::NOT_FOUND, NO_WEATHER_MESSAGE),
            FetchError::Upstream(_) | FetchError::Malformed(_) => {
                log::error!("Error fetching {}: {}", self.feed, self.error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.feed.failure_message(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        ErrorResponse {
            message: message.to_string(),
        }
    }
}
