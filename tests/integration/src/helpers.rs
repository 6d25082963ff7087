//! Test helpers for integration tests
//!
//! [`MockPlatform`] serves the REST routes and the WebSocket gateway the
//! logger talks to, on an ephemeral port, and records every message posted
//! to it. [`TestBot`] runs the real logger against it.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use audit_common::{AppConfig, AppResult};
use audit_core::Snowflake;
use audit_gateway::events::{
    ChannelPayload, GuildCreateEvent, MessageCreateEvent, MessageDeleteEvent, ReadyEvent,
};
use audit_gateway::http::{AuditLogEntryPayload, AuditLogPayload};
use audit_gateway::protocol::{GatewayMessage, OpCode};
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::fixtures::{bot_user, BOT_TOKEN};

/// Heartbeat interval the mock gateway announces
pub const MOCK_HEARTBEAT_MS: u64 = 1_000;

/// How long waits poll before giving up
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// A message the logger posted
#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub channel_id: Snowflake,
    pub content: Option<String>,
    pub embeds: Vec<Value>,
}

impl PostedMessage {
    /// Title of the first embed
    pub fn title(&self) -> Option<&str> {
        self.embeds.first()?.get("title")?.as_str()
    }

    /// Value of a named field in the first embed
    pub fn field(&self, name: &str) -> Option<&str> {
        self.embeds
            .first()?
            .get("fields")?
            .as_array()?
            .iter()
            .find(|f| f["name"] == name)?
            .get("value")?
            .as_str()
    }

    pub fn color(&self) -> Option<u64> {
        self.embeds.first()?.get("color")?.as_u64()
    }
}

/// Frame pushed to every connected gateway session
#[derive(Debug, Clone)]
enum ServerFrame {
    Dispatch { event_type: String, data: Value },
    Raw(GatewayMessage),
    Close { code: u16, reason: String },
}

struct MockInner {
    token: String,
    guilds: Mutex<Vec<GuildCreateEvent>>,
    channels: Mutex<HashMap<Snowflake, ChannelPayload>>,
    messages: Mutex<HashMap<(Snowflake, Snowflake), MessageCreateEvent>>,
    /// Newest first
    audit_logs: Mutex<HashMap<Snowflake, Vec<AuditLogEntryPayload>>>,
    forbidden: Mutex<HashSet<Snowflake>>,
    posted: Mutex<Vec<PostedMessage>>,
    frames: broadcast::Sender<ServerFrame>,
    heartbeat_ms: AtomicU64,
    hellos: AtomicUsize,
    identifies: AtomicUsize,
    sessions: AtomicUsize,
    sequence: AtomicU64,
}

type MockState = Arc<MockInner>;

/// Mock chat platform instance that manages lifecycle
pub struct MockPlatform {
    pub addr: SocketAddr,
    state: MockState,
    _handle: JoinHandle<()>,
}

impl MockPlatform {
    /// Start a mock platform accepting the default test token
    pub async fn start() -> Result<Self> {
        Self::start_with_token(BOT_TOKEN).await
    }

    pub async fn start_with_token(token: &str) -> Result<Self> {
        let (frames, _) = broadcast::channel(256);
        let state = Arc::new(MockInner {
            token: token.to_string(),
            guilds: Mutex::new(Vec::new()),
            channels: Mutex::new(HashMap::new()),
            messages: Mutex::new(HashMap::new()),
            audit_logs: Mutex::new(HashMap::new()),
            forbidden: Mutex::new(HashSet::new()),
            posted: Mutex::new(Vec::new()),
            frames,
            heartbeat_ms: AtomicU64::new(MOCK_HEARTBEAT_MS),
            hellos: AtomicUsize::new(0),
            identifies: AtomicUsize::new(0),
            sessions: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
        });

        let app = Router::new()
            .route("/api/v1/users/@me", get(current_user))
            .route("/api/v1/channels/:channel_id", get(get_channel))
            .route(
                "/api/v1/channels/:channel_id/messages",
                axum::routing::post(create_message),
            )
            .route(
                "/api/v1/channels/:channel_id/messages/:message_id",
                get(get_message),
            )
            .route("/api/v1/guilds/:guild_id/audit-logs", get(audit_logs))
            .route("/gateway", get(gateway))
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Logger configuration pointing at this platform
    pub fn bot_config(&self, token: &str) -> Result<AppConfig> {
        let vars: HashMap<&str, String> = HashMap::from([
            ("BOT_TOKEN", token.to_string()),
            ("PLATFORM_API_URL", self.api_url()),
            ("PLATFORM_GATEWAY_URL", self.gateway_url()),
            ("HTTP_TIMEOUT_SECS", "5".to_string()),
            ("GATEWAY_RECONNECT_DELAY_MS", "50".to_string()),
            ("STORE_BACKEND", "memory".to_string()),
        ]);
        AppConfig::from_lookup(|key| vars.get(key).cloned())
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))
    }

    // === Platform state ===

    /// Register a guild; it is sent to every session after READY
    pub fn add_guild(&self, guild: GuildCreateEvent) {
        for channel in &guild.channels {
            let mut channel = channel.clone();
            channel.guild_id = Some(guild.id);
            self.add_channel(channel);
        }
        self.state.guilds.lock().push(guild);
    }

    pub fn add_channel(&self, channel: ChannelPayload) {
        self.state.channels.lock().insert(channel.id, channel);
    }

    pub fn remove_channel(&self, channel_id: Snowflake) {
        self.state.channels.lock().remove(&channel_id);
    }

    /// Store a message without announcing it on the gateway
    pub fn add_message(&self, message: MessageCreateEvent) {
        self.state
            .messages
            .lock()
            .insert((message.channel_id, message.id), message);
    }

    pub fn push_audit_entry(&self, guild_id: Snowflake, entry: AuditLogEntryPayload) {
        self.state
            .audit_logs
            .lock()
            .entry(guild_id)
            .or_default()
            .insert(0, entry);
    }

    /// Make posts to a channel fail with 403
    pub fn forbid_channel(&self, channel_id: Snowflake) {
        self.state.forbidden.lock().insert(channel_id);
    }

    // === Gateway ===

    /// Send a dispatch to every connected session
    pub fn dispatch(&self, event_type: &str, data: Value) {
        let _ = self.state.frames.send(ServerFrame::Dispatch {
            event_type: event_type.to_string(),
            data,
        });
    }

    /// Post a message: store it and announce MESSAGE_CREATE
    pub fn create_message(&self, message: MessageCreateEvent) {
        self.add_message(message.clone());
        self.dispatch("MESSAGE_CREATE", to_value(&message));
    }

    /// Delete a message: forget it and announce MESSAGE_DELETE
    pub fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) {
        self.state.messages.lock().remove(&(channel_id, message_id));
        let guild_id = self
            .state
            .channels
            .lock()
            .get(&channel_id)
            .and_then(|c| c.guild_id);
        self.dispatch(
            "MESSAGE_DELETE",
            to_value(&MessageDeleteEvent {
                id: message_id,
                channel_id,
                guild_id,
            }),
        );
    }

    /// Send a non-dispatch frame such as op 5 or op 7
    pub fn send_frame(&self, message: GatewayMessage) {
        let _ = self.state.frames.send(ServerFrame::Raw(message));
    }

    /// Close every session with a close code
    pub fn close_sessions(&self, code: u16, reason: &str) {
        let _ = self.state.frames.send(ServerFrame::Close {
            code,
            reason: reason.to_string(),
        });
    }

    /// Heartbeat interval announced in later Hello frames
    pub fn set_heartbeat_interval(&self, millis: u64) {
        self.state.heartbeat_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of Hello frames sent
    pub fn hello_count(&self) -> usize {
        self.state.hellos.load(Ordering::SeqCst)
    }

    /// Number of Identify frames received
    pub fn identify_count(&self) -> usize {
        self.state.identifies.load(Ordering::SeqCst)
    }

    /// Number of sessions that received READY and their guilds
    pub fn session_count(&self) -> usize {
        self.state.sessions.load(Ordering::SeqCst)
    }

    // === Recorded output ===

    pub fn posted(&self) -> Vec<PostedMessage> {
        self.state.posted.lock().clone()
    }

    pub fn posted_to(&self, channel_id: Snowflake) -> Vec<PostedMessage> {
        self.posted()
            .into_iter()
            .filter(|p| p.channel_id == channel_id)
            .collect()
    }

    /// Wait until at least `count` connections were greeted
    pub async fn wait_for_hellos(&self, count: usize) -> Result<()> {
        wait_until(|| self.hello_count() >= count)
            .await
            .map_err(|()| anyhow::anyhow!("expected {count} hellos, got {}", self.hello_count()))
    }

    /// Wait until at least `count` sessions are ready
    pub async fn wait_for_sessions(&self, count: usize) -> Result<()> {
        wait_until(|| self.session_count() >= count)
            .await
            .map_err(|()| anyhow::anyhow!("expected {count} sessions, got {}", self.session_count()))
    }

    /// Wait until at least `count` messages were posted in total
    pub async fn wait_for_posts(&self, count: usize) -> Result<Vec<PostedMessage>> {
        wait_until(|| self.state.posted.lock().len() >= count)
            .await
            .map_err(|()| anyhow::anyhow!("expected {count} posts, got {:?}", self.posted()))?;
        Ok(self.posted())
    }

    /// Assert nothing more than `count` posts arrive within a short window
    pub async fn assert_post_count_stays(&self, count: usize) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let posted = self.posted();
        if posted.len() != count {
            anyhow::bail!("expected {count} posts, got {posted:?}");
        }
        Ok(())
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) -> Result<(), ()> {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    if condition() {
        Ok(())
    } else {
        Err(())
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// === REST routes ===

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "code": 0 }))).into_response()
}

fn authorize(state: &MockInner, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bot {}", state.token);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "401: Unauthorized")),
    }
}

fn parse_id(raw: &str) -> Result<Snowflake, Response> {
    Snowflake::parse(raw).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid snowflake"))
}

async fn current_user(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(bot_user()).into_response()
}

async fn get_channel(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(channel_id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let channel_id = match parse_id(&channel_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.channels.lock().get(&channel_id) {
        Some(channel) => Json(channel.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Unknown Channel"),
    }
}

async fn get_message(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path((channel_id, message_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let (channel_id, message_id) = match (parse_id(&channel_id), parse_id(&message_id)) {
        (Ok(c), Ok(m)) => (c, m),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    match state.messages.lock().get(&(channel_id, message_id)) {
        Some(message) => Json(message.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Unknown Message"),
    }
}

#[derive(Debug, Deserialize)]
struct AuditLogQuery {
    action_type: Option<i32>,
    limit: Option<usize>,
}

async fn audit_logs(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(guild_id): Path<String>,
    Query(query): Query<AuditLogQuery>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let guild_id = match parse_id(&guild_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let entries = state
        .audit_logs
        .lock()
        .get(&guild_id)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|e| query.action_type.map_or(true, |a| e.action_type == a))
        .take(query.limit.unwrap_or(50))
        .collect();
    Json(AuditLogPayload {
        audit_log_entries: entries,
    })
    .into_response()
}

async fn create_message(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let channel_id = match parse_id(&channel_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if state.forbidden.lock().contains(&channel_id) {
        return error(StatusCode::FORBIDDEN, "Missing Access");
    }
    if !state.channels.lock().contains_key(&channel_id) {
        return error(StatusCode::NOT_FOUND, "Unknown Channel");
    }

    let posted = PostedMessage {
        channel_id,
        content: body["content"].as_str().map(str::to_string),
        embeds: body["embeds"].as_array().cloned().unwrap_or_default(),
    };
    state.posted.lock().push(posted);

    (StatusCode::OK, Json(json!({ "id": "1", "channel_id": channel_id }))).into_response()
}

// === Gateway ===

async fn gateway(State(state): State<MockState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn send(socket: &mut WebSocket, message: &GatewayMessage) -> bool {
    match message.to_json() {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(_) => false,
    }
}

fn next_dispatch(state: &MockInner, event_type: &str, data: Value) -> GatewayMessage {
    let sequence = state.sequence.fetch_add(1, Ordering::SeqCst) + 1;
    GatewayMessage::dispatch(event_type, sequence, data)
}

async fn handle_socket(state: MockState, mut socket: WebSocket) {
    let heartbeat_ms = state.heartbeat_ms.load(Ordering::SeqCst);
    state.hellos.fetch_add(1, Ordering::SeqCst);
    if !send(&mut socket, &GatewayMessage::hello(heartbeat_ms)).await {
        return;
    }

    let identify = loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                if let Some(identify) = GatewayMessage::from_json(&text)
                    .ok()
                    .and_then(|m| m.as_identify())
                {
                    break identify;
                }
            }
            Some(Ok(_)) => {}
            _ => return,
        }
    };
    state.identifies.fetch_add(1, Ordering::SeqCst);

    if identify.token != state.token {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: 4004,
                reason: Cow::from("Authentication failed"),
            })))
            .await;
        return;
    }

    // Subscribe before READY so nothing pushed afterwards is missed
    let mut frames = state.frames.subscribe();

    let ready = ReadyEvent {
        user: bot_user(),
        guilds: Vec::new(),
        session_id: format!("session-{}", state.identifies.load(Ordering::SeqCst)),
    };
    let mut opening = vec![next_dispatch(&state, "READY", to_value(&ready))];
    let guilds = state.guilds.lock().clone();
    for guild in &guilds {
        opening.push(next_dispatch(&state, "GUILD_CREATE", to_value(guild)));
    }
    for message in &opening {
        if !send(&mut socket, message).await {
            return;
        }
    }
    state.sessions.fetch_add(1, Ordering::SeqCst);

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let is_heartbeat = GatewayMessage::from_json(&text)
                        .map(|m| m.op == OpCode::Heartbeat)
                        .unwrap_or(false);
                    if is_heartbeat && !send(&mut socket, &GatewayMessage::heartbeat_ack()).await {
                        return;
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => return,
                Some(Ok(_)) => {}
            },
            frame = frames.recv() => match frame {
                Ok(ServerFrame::Dispatch { event_type, data }) => {
                    if !send(&mut socket, &next_dispatch(&state, &event_type, data)).await {
                        return;
                    }
                }
                Ok(ServerFrame::Raw(message)) => {
                    if !send(&mut socket, &message).await {
                        return;
                    }
                }
                Ok(ServerFrame::Close { code, reason }) => {
                    let _ = socket
                        .send(Message::Close(Some(CloseFrame {
                            code,
                            reason: Cow::from(reason),
                        })))
                        .await;
                    return;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return,
            },
        }
    }
}

/// The logger running against a mock platform
pub struct TestBot {
    handle: JoinHandle<AppResult<()>>,
}

impl TestBot {
    /// Start the logger with the default test token
    pub async fn start(mock: &MockPlatform) -> Result<Self> {
        let bot = Self::start_with_config(mock.bot_config(BOT_TOKEN)?);
        mock.wait_for_sessions(1).await?;
        Ok(bot)
    }

    /// Start the logger without waiting for a session
    pub fn start_with_config(config: AppConfig) -> Self {
        Self {
            handle: tokio::spawn(audit_gateway::run(config)),
        }
    }

    /// Whether the logger task is still alive
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Wait for the logger to stop on its own
    pub async fn wait_for_exit(&mut self) -> Result<AppResult<()>> {
        let joined = tokio::time::timeout(WAIT_TIMEOUT, &mut self.handle).await?;
        Ok(joined?)
    }
}

impl Drop for TestBot {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
