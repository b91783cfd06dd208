mod sample;
mod simulator;

pub use sample::TelemetrySample;
pub use simulator::TelemetrySimulator;
