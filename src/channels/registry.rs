use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::error::ChannelError;
use super::job::EmissionJob;
use crate::telemetry::TelemetrySample;

pub type ChannelId = Uuid;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug)]
struct Channel {
    state: ChannelState,
    job: Option<EmissionJob>,
}

/// Live push channels and the emission job each one owns.
///
/// `close` is the only way a channel leaves the registry, and it cancels the
/// job in the same step, so no job can outlive its channel.
#[derive(Clone)]
pub struct ChannelRegistry {
    channels: Arc<Mutex<HashMap<ChannelId, Channel>>>,
    period: Duration,
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl ChannelRegistry {
    pub fn new(period: Duration) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            period,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChannelId, Channel>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new channel that has not completed its handshake yet.
    pub fn connect(&self) -> ChannelId {
        let id = Uuid::new_v4();
        self.lock().insert(
            id,
            Channel {
                state: ChannelState::Connecting,
                job: None,
            },
        );
        id
    }

    /// Completes the handshake and starts the channel's emission job.
    pub fn open(
        &self,
        id: ChannelId,
        sink: mpsc::Sender<TelemetrySample>,
    ) -> Result<(), ChannelError> {
        let mut channels = self.lock();
        let channel = channels.get_mut(&id).ok_or(ChannelError::Unknown(id))?;

        if channel.job.is_some() {
            return Err(ChannelError::JobAlreadyRunning(id));
        }

        channel.job = Some(EmissionJob::spawn(id, self.period, sink));
        channel.state = ChannelState::Open;
        log::info!("channel {} open, emitting every {:?}", id, self.period);
        Ok(())
    }

    /// Removes the channel and cancels its job before returning.
    pub async fn close(&self, id: ChannelId) -> Result<ChannelState, ChannelError> {
        let mut channel = self.lock().remove(&id).ok_or(ChannelError::Unknown(id))?;

        let pending = channel.job.take().map(EmissionJob::cancel);
        channel.state = ChannelState::Closed;

        if let Some(join) = pending {
            // Cancelled tasks report a JoinError; anything else is a panic in the loop.
            if let Err(e) = join.await {
                if !e.is_cancelled() {
                    log::error!("emission job for channel {} failed: {}", id, e);
                }
            }
        }

        log::info!("channel {} closed", id);
        Ok(channel.state)
    }

    #[cfg(test)]
    pub fn state(&self, id: ChannelId) -> Option<ChannelState> {
        self.lock().get(&id).map(|c| c.state)
    }

    pub fn open_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|c| c.state == ChannelState::Open)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_channel(registry: &ChannelRegistry) -> (ChannelId, mpsc::Receiver<TelemetrySample>) {
        let (tx, rx) = mpsc::channel(16);
        let id = registry.connect();
        registry.open(id, tx).unwrap();
        (id, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn emits_one_sample_per_period_in_order() {
        let registry = ChannelRegistry::default();
        let (id, mut rx) = open_channel(&registry);

        tokio::time::sleep(Duration::from_millis(3_500)).await;

        let mut samples = Vec::new();
        while let Ok(sample) = rx.try_recv() {
            samples.push(sample);
        }
        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(samples.windows(2).all(|w| w[1].battery <= w[0].battery));

        registry.close(id).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_immediate_close() {
        let registry = ChannelRegistry::default();
        let (id, mut rx) = open_channel(&registry);

        assert_eq!(registry.close(id).await.unwrap(), ChannelState::Closed);
        assert_eq!(registry.open_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.recv().await.is_none(), "job kept emitting after close");
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_pending_ticks_mid_stream() {
        let registry = ChannelRegistry::default();
        let (id, mut rx) = open_channel(&registry);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        registry.close(id).await.unwrap();

        let mut delivered = 0;
        while rx.recv().await.is_some() {
            delivered += 1;
        }
        assert_eq!(delivered, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_one_channel_leaves_others_running() {
        let registry = ChannelRegistry::default();
        let (first, _first_rx) = open_channel(&registry);
        let (second, mut second_rx) = open_channel(&registry);

        registry.close(first).await.unwrap();
        assert_eq!(registry.state(second), Some(ChannelState::Open));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(second_rx.try_recv().is_ok());

        registry.close(second).await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_happens_exactly_once() {
        let registry = ChannelRegistry::default();
        let (id, _rx) = open_channel(&registry);

        registry.close(id).await.unwrap();
        assert!(matches!(
            registry.close(id).await,
            Err(ChannelError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn second_job_on_same_channel_is_rejected() {
        let registry = ChannelRegistry::default();
        let (id, _rx) = open_channel(&registry);
        let (tx, _other_rx) = mpsc::channel(1);

        assert!(matches!(
            registry.open(id, tx),
            Err(ChannelError::JobAlreadyRunning(_))
        ));
        registry.close(id).await.unwrap();
    }

    #[tokio::test]
    async fn connecting_channel_closes_without_job() {
        let registry = ChannelRegistry::default();
        let id = registry.connect();

        assert_eq!(registry.state(id), Some(ChannelState::Connecting));
        assert_eq!(registry.open_count(), 0);
        assert_eq!(registry.close(id).await.unwrap(), ChannelState::Closed);
        assert_eq!(registry.state(id), None);
    }
}
