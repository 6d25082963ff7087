//! Gateway session loop

use std::sync::Arc;
use std::time::Duration;

use audit_common::AppConfig;
use audit_service::AuditPipeline;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, instrument, trace, warn};

use super::heartbeat;
use super::session::SessionState;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{GatewayMessage, IdentifyPayload, OpCode};
use crate::router::{Routed, Translator};

/// Channel buffer size for outgoing frames
const OUTBOUND_BUFFER_SIZE: usize = 32;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub identify: IdentifyPayload,
    /// Delay before a fresh session after a resumable ending
    pub reconnect_delay: Duration,
}

impl GatewayConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            url: config.platform.gateway_url.clone(),
            identify: IdentifyPayload::for_bot(config.bot.token.clone()),
            reconnect_delay: Duration::from_millis(config.platform.reconnect_delay_ms),
        }
    }
}

/// Gateway client
pub struct GatewayClient {
    config: GatewayConfig,
    translator: Translator,
    pipeline: AuditPipeline,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig, translator: Translator, pipeline: AuditPipeline) -> Self {
        Self {
            config,
            translator,
            pipeline,
        }
    }

    /// Keep a session open until a fatal error
    pub async fn run(&self) -> GatewayResult<()> {
        loop {
            match self.run_session().await {
                Ok(()) => info!("Gateway asked for a new session"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(error = %e, "Gateway session ended"),
            }

            debug!(delay_ms = self.config.reconnect_delay.as_millis(), "Reconnecting");
            sleep(self.config.reconnect_delay).await;
        }
    }

    /// Run one session from connect to close
    ///
    /// `Ok` means the server asked for a new session.
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn run_session(&self) -> GatewayResult<()> {
        let (socket, _) = connect_async(self.config.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = match next_message(&mut stream).await? {
            Some(message) => message
                .as_hello()
                .ok_or_else(|| GatewayError::protocol(format!("expected Hello, got op {}", message.op)))?,
            None => return Err(GatewayError::closed(None, "closed before Hello")),
        };
        let heartbeat_interval = heartbeat::interval_from(&hello)?;
        info!(heartbeat_interval = hello.heartbeat_interval, "Connected to gateway");

        let identify = GatewayMessage::identify(&self.config.identify)?;
        sink.send(Message::Text(identify.to_json()?)).await?;

        let state = Arc::new(SessionState::new());
        let (tx, rx) = mpsc::channel::<GatewayMessage>(OUTBOUND_BUFFER_SIZE);

        let mut heartbeat_task = tokio::spawn(heartbeat::run(
            heartbeat_interval,
            state.clone(),
            tx.clone(),
        ));
        let mut send_task = tokio::spawn(write_loop(sink, rx));

        let result = tokio::select! {
            result = self.read_loop(&mut stream, &state, &tx) => result,
            result = &mut heartbeat_task => joined(result, "heartbeat"),
            result = &mut send_task => joined(result, "send").and_then(|()| {
                Err(GatewayError::closed(None, "send task stopped"))
            }),
        };

        heartbeat_task.abort();
        send_task.abort();
        result
    }

    async fn read_loop(
        &self,
        stream: &mut SplitStream<Socket>,
        state: &SessionState,
        outbound: &mpsc::Sender<GatewayMessage>,
    ) -> GatewayResult<()> {
        while let Some(message) = next_message(stream).await? {
            match message.op {
                OpCode::Dispatch => {
                    if let Some(sequence) = message.s {
                        state.observe_sequence(sequence);
                    }
                    self.on_dispatch(message, state);
                }
                OpCode::Heartbeat => {
                    // Server requested an immediate beat
                    outbound
                        .send(GatewayMessage::heartbeat(state.sequence()))
                        .await
                        .map_err(|_| GatewayError::closed(None, "outbound channel closed"))?;
                }
                OpCode::HeartbeatAck => {
                    trace!("Heartbeat acknowledged");
                    state.ack_heartbeat();
                }
                OpCode::Reconnect => return Ok(()),
                OpCode::InvalidSession => {
                    if !state.is_ready() {
                        return Err(GatewayError::InvalidSession);
                    }
                    warn!("Session invalidated");
                    return Ok(());
                }
                other => debug!(op = %other, "Ignoring unexpected opcode"),
            }
        }

        Err(GatewayError::closed(None, "stream ended"))
    }

    /// Translate in order, then hand the work to its own task
    fn on_dispatch(&self, message: GatewayMessage, state: &SessionState) {
        let Some(event_type) = message.t else {
            warn!("Dispatch without event type");
            return;
        };

        let routed = match self
            .translator
            .translate(&event_type, message.d.unwrap_or(Value::Null))
        {
            Ok(routed) => routed,
            Err(e) => {
                warn!(event_type = %event_type, error = %e, "Dropping undecodable dispatch");
                return;
            }
        };

        match routed {
            Routed::Ready { user_tag } => {
                state.mark_ready();
                info!("Logged in as {user_tag}");
            }
            Routed::Event(event) => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    pipeline.handle_event(event).await;
                });
            }
            Routed::Message {
                guild_id,
                channel_id,
                content,
            } => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    pipeline
                        .handle_command(Some(guild_id), channel_id, &content)
                        .await;
                });
            }
            Routed::Nothing => {}
        }
    }
}

/// Next gateway message, `None` when the stream ends
///
/// A close frame becomes an error carrying its code.
async fn next_message(stream: &mut SplitStream<Socket>) -> GatewayResult<Option<GatewayMessage>> {
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => return Ok(Some(GatewayMessage::from_json(&text)?)),
            Message::Close(frame) => {
                let (code, reason) = frame.map_or((None, String::new()), |f| {
                    (Some(u16::from(f.code)), f.reason.into_owned())
                });
                return Err(GatewayError::closed(code, reason));
            }
            Message::Binary(_) => {
                return Err(GatewayError::protocol("binary frames are not supported"));
            }
            // Ping/pong are answered by tungstenite
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Ok(None)
}

async fn write_loop(
    mut sink: SplitSink<Socket, Message>,
    mut outbound: mpsc::Receiver<GatewayMessage>,
) -> GatewayResult<()> {
    while let Some(message) = outbound.recv().await {
        sink.send(Message::Text(message.to_json()?)).await?;
    }
    sink.close().await?;
    Ok(())
}

fn joined(result: Result<GatewayResult<()>, JoinError>, task: &str) -> GatewayResult<()> {
    result.map_err(|e| GatewayError::protocol(format!("{task} task failed: {e}")))?
}
