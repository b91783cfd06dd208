use crate::channels::ChannelRegistry;
use crate::upstream::Adapters;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub adapters: Adapters,
    pub channels: ChannelRegistry,
}

impl AppState {
    pub fn new(adapters: Adapters, channels: ChannelRegistry) -> Self {
        Self { adapters, channels }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.adapters(),
            ChannelRegistry::new(config.telemetry.period),
        )
    }
}
