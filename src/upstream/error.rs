use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API credential is missing or still set to the placeholder")]
    MissingCredential,
    #[error("upstream returned no data: {0}")]
    NoData(&'static str),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("unexpected upstream payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}
