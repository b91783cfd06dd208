use thiserror::Error;

use super::registry::ChannelId;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel {0} is not registered")]
    Unknown(ChannelId),
    #[error("channel {0} already has an emission job")]
    JobAlreadyRunning(ChannelId),
    #[error("channel {0} ticked after its receiver was gone")]
    LifecycleViolation(ChannelId),
}
