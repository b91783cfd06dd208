use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use utoipa::ToSchema;

use crate::channels::ChannelRegistry;
use crate::telemetry::TelemetrySample;
use crate::web::state::AppState;

pub const TELEMETRY_EVENT: &str = "telemetryData";

/// Samples buffered per channel before new ones are dropped.
const SAMPLE_BUFFER: usize = 8;

/// Frame pushed to clients: `{"event": "telemetryData", "data": {...}}`.
#[derive(Debug, Serialize)]
pub struct Event<'a, T> {
    pub event: &'a str,
    pub data: &'a T,
}

pub fn encode_sample(sample: &TelemetrySample) -> serde_json::Result<String> {
    serde_json::to_string(&Event {
        event: TELEMETRY_EVENT,
        data: sample,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelCount {
    pub open: usize,
}

#[utoipa::path(
    get,
    path = "/api/telemetry/channels",
    responses(
        (status = 200, description = "Number of open telemetry channels", body = ChannelCount)
    ),
    tag = "telemetry"
)]
pub async fn channel_count(State(state): State<AppState>) -> Json<ChannelCount> {
    Json(ChannelCount {
        open: state.channels.open_count(),
    })
}

pub async fn stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.channels))
}

async fn handle_socket(socket: WebSocket, channels: ChannelRegistry) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut samples) = mpsc::channel(SAMPLE_BUFFER);

    let id = channels.connect();
    if let Err(e) = channels.open(id, tx) {
        log::error!("failed to open telemetry channel: {}", e);
        let _ = channels.close(id).await;
        return;
    }

    loop {
        tokio::select! {
            sample = samples.recv() => {
                let Some(sample) = sample else { break };
                let frame = match encode_sample(&sample) {
                    Ok(frame) => frame,
                    Err(e) => {
                        log::error!("failed to encode telemetry sample: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("telemetry channel {} errored: {}", id, e);
                    break;
                }
            },
        }
    }

    match channels.close(id).await {
        Ok(state) => log::debug!("telemetry channel {} is {}", id, state),
        Err(e) => log::error!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn frames_carry_event_name_and_sample() {
        let sample = TelemetrySample {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            altitude: 408.0,
            velocity: 27600.0,
            temperature: 20.0,
            voltage: 120.0,
            battery: 98.5,
            signal: -75.0,
        };

        let frame: serde_json::Value =
            serde_json::from_str(&encode_sample(&sample).unwrap()).unwrap();

        assert_eq!(frame["event"], TELEMETRY_EVENT);
        assert_eq!(frame["data"]["timestamp"], "2024-01-01T00:00:00.000Z");
        assert_eq!(frame["data"]["battery"], 98.5);
        assert_eq!(frame["data"]["signal"], -75.0);
    }
}
