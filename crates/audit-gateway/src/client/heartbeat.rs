//! Heartbeat task (op 1)

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};

use super::session::SessionState;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{GatewayMessage, HelloPayload};

/// Heartbeat interval announced by Hello
///
/// A zero interval cannot drive a ticker; it ends the session instead.
pub(crate) fn interval_from(hello: &HelloPayload) -> GatewayResult<Duration> {
    if hello.heartbeat_interval == 0 {
        return Err(GatewayError::protocol("Hello announced a zero heartbeat interval"));
    }
    Ok(Duration::from_millis(hello.heartbeat_interval))
}

/// Send heartbeats until the connection zombies or the writer goes away
///
/// The first beat is delayed by a random fraction of the interval so that
/// many clients reconnecting at once do not beat in lockstep.
pub(crate) async fn run(
    heartbeat_interval: Duration,
    state: Arc<SessionState>,
    outbound: mpsc::Sender<GatewayMessage>,
) -> GatewayResult<()> {
    if heartbeat_interval.is_zero() {
        return Err(GatewayError::protocol("zero heartbeat interval"));
    }

    sleep(heartbeat_interval.mul_f64(rand::random::<f64>())).await;

    let mut ticker = interval(heartbeat_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if !state.take_heartbeat_ack() {
            tracing::warn!("Connection zombied (heartbeat not ACKed)");
            return Err(GatewayError::HeartbeatTimeout);
        }

        let sequence = state.sequence();
        tracing::trace!(sequence = ?sequence, "Sending heartbeat");
        if outbound.send(GatewayMessage::heartbeat(sequence)).await.is_err() {
            return Err(GatewayError::closed(None, "outbound channel closed"));
        }
    }
}
