pub mod error;
pub mod space;
pub mod telemetry;
