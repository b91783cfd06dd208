mod error;
mod job;
mod registry;

pub use registry::{ChannelRegistry, DEFAULT_PERIOD};
