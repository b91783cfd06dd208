mod adapters;
mod client;
mod credential;
mod error;
mod neo;
mod position;
mod types;
mod weather;

pub use adapters::{Adapters, Endpoints};
pub use client::HttpClient;
pub use credential::Credential;
pub use error::FetchError;
pub use types::{NearObjectSummary, PositionRecord, WeatherSummary};

#[cfg(test)]
pub(crate) use client::testing;
