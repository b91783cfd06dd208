use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::sample::TelemetrySample;

/// Nominal value and full jitter span of one simulated channel.
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub nominal: f64,
    pub amplitude: f64,
}

pub const ALTITUDE_KM: Baseline = Baseline { nominal: 408.5, amplitude: 10.0 };
pub const VELOCITY_KMH: Baseline = Baseline { nominal: 27600.2, amplitude: 50.0 };
pub const TEMPERATURE_C: Baseline = Baseline { nominal: 20.1, amplitude: 10.0 };
pub const VOLTAGE_V: Baseline = Baseline { nominal: 120.5, amplitude: 2.0 };
pub const SIGNAL_DBM: Baseline = Baseline { nominal: -75.3, amplitude: 5.0 };

pub const BATTERY_START_PCT: f64 = 98.6;
pub const BATTERY_MAX_DECAY_PCT: f64 = 0.1;
pub const BATTERY_FLOOR_PCT: f64 = 0.0;

/// Per-channel sample generator.
///
/// Every field except battery is an independent draw around its baseline.
/// Battery carries over between ticks and only ever goes down.
pub struct TelemetrySimulator<R = StdRng> {
    rng: R,
    battery: f64,
}

impl TelemetrySimulator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for TelemetrySimulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            battery: BATTERY_START_PCT,
        }
    }

    fn jitter(&mut self, baseline: Baseline) -> f64 {
        baseline.nominal + (self.rng.random::<f64>() - 0.5) * baseline.amplitude
    }

    pub fn next_sample(&mut self, timestamp: DateTime<Utc>) -> TelemetrySample {
        let decay = self.rng.random::<f64>() * BATTERY_MAX_DECAY_PCT;
        self.battery = (self.battery - decay).max(BATTERY_FLOOR_PCT);

        TelemetrySample {
            timestamp,
            altitude: self.jitter(ALTITUDE_KM),
            velocity: self.jitter(VELOCITY_KMH),
            temperature: self.jitter(TEMPERATURE_C),
            voltage: self.jitter(VOLTAGE_V),
            battery: self.battery,
            signal: self.jitter(SIGNAL_DBM),
        }
    }
}
