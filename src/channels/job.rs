use chrono::Utc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::error::ChannelError;
use super::registry::ChannelId;
use crate::telemetry::{TelemetrySample, TelemetrySimulator};

/// The periodic emission task bound to one channel.
#[derive(Debug)]
pub(super) struct EmissionJob {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl EmissionJob {
    pub(super) fn spawn(
        id: ChannelId,
        period: Duration,
        sink: mpsc::Sender<TelemetrySample>,
    ) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_emission_loop(id, period, sink, stop_rx));
        Self { stop_tx, join }
    }

    /// Stops the job without yielding. The returned handle resolves once the
    /// task (and with it the sample sender) has been dropped.
    pub(super) fn cancel(self) -> JoinHandle<()> {
        let _ = self.stop_tx.send(());
        self.join.abort();
        self.join
    }
}

async fn run_emission_loop(
    id: ChannelId,
    period: Duration,
    sink: mpsc::Sender<TelemetrySample>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut simulator = TelemetrySimulator::new();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        match sink.try_send(simulator.next_sample(Utc::now())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::debug!("channel {} is not keeping up, dropped a sample", id);
            }
            Err(TrySendError::Closed(_)) => {
                log::error!("{}", ChannelError::LifecycleViolation(id));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn job_ends_itself_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let job = EmissionJob::spawn(Uuid::new_v4(), Duration::from_secs(1), tx);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(job.join.is_finished());
    }
}
