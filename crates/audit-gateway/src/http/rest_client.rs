//! REST client
//!
//! Thin typed wrapper over the platform's HTTP API. One attempt per call:
//! the timeout guards the transport, there are no retries.

use std::fmt::Display;
use std::time::Duration;

use audit_common::AppConfig;
use audit_core::{AuditLogAction, AuditLogEntry, AuditRecord, PlatformError, PlatformResult, Snowflake};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::events::{ChannelPayload, MessageCreateEvent, UserPayload};

/// REST client settings
#[derive(Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl RestConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.platform.api_url.clone(),
            token: config.bot.token.clone(),
            timeout: Duration::from_secs(config.platform.http_timeout_secs),
        }
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `GET /guilds/{id}/audit-logs` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogPayload {
    #[serde(default)]
    pub audit_log_entries: Vec<AuditLogEntryPayload>,
}

/// One audit log row as sent by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntryPayload {
    pub id: Snowflake,
    pub action_type: i32,
    /// Executor
    #[serde(default)]
    pub user_id: Option<Snowflake>,
    #[serde(default)]
    pub target_id: Option<Snowflake>,
}

impl From<AuditLogEntryPayload> for AuditLogEntry {
    fn from(entry: AuditLogEntryPayload) -> Self {
        Self {
            id: entry.id,
            action_type: entry.action_type,
            executor_id: entry.user_id,
            target_id: entry.target_id,
        }
    }
}

/// `POST /channels/{id}/messages` body
#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<&'a AuditRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Platform REST client
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Build a client that authenticates every request with the bot token
    pub fn new(config: &RestConfig) -> PlatformResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.token))
            .map_err(|_| PlatformError::Unauthorized)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The authenticated user; used as the startup credential check
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> PlatformResult<UserPayload> {
        self.get_json("/users/@me", "user", "@me").await
    }

    #[instrument(skip(self))]
    pub async fn get_channel(&self, channel_id: Snowflake) -> PlatformResult<ChannelPayload> {
        self.get_json(&format!("/channels/{channel_id}"), "channel", channel_id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<MessageCreateEvent> {
        self.get_json(
            &format!("/channels/{channel_id}/messages/{message_id}"),
            "message",
            message_id,
        )
        .await
    }

    /// Most recent audit log entries of one action type, newest first
    #[instrument(skip(self))]
    pub async fn audit_logs(
        &self,
        guild_id: Snowflake,
        action: AuditLogAction,
        limit: u8,
    ) -> PlatformResult<AuditLogPayload> {
        let request = self
            .http
            .get(self.url(&format!("/guilds/{guild_id}/audit-logs")))
            .query(&[
                ("action_type", action.as_i32().to_string()),
                ("limit", limit.to_string()),
            ]);
        let response = self.execute(request, "guild", guild_id).await?;
        decode(response).await
    }

    /// Post a plain text message
    #[instrument(skip(self, content))]
    pub async fn post_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.post_message(
            channel_id,
            &CreateMessage {
                content: Some(content),
                embeds: Vec::new(),
            },
        )
        .await
    }

    /// Post an audit record as an embed
    #[instrument(skip(self, record), fields(title = %record.title))]
    pub async fn post_record(&self, channel_id: Snowflake, record: &AuditRecord) -> PlatformResult<()> {
        self.post_message(
            channel_id,
            &CreateMessage {
                content: None,
                embeds: vec![record],
            },
        )
        .await
    }

    async fn post_message(&self, channel_id: Snowflake, body: &CreateMessage<'_>) -> PlatformResult<()> {
        let request = self
            .http
            .post(self.url(&format!("/channels/{channel_id}/messages")))
            .json(body);
        self.execute(request, "channel", channel_id).await?;
        debug!(channel_id = %channel_id, "Message posted");
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &'static str,
        id: impl Display,
    ) -> PlatformResult<T> {
        let response = self.execute(self.http.get(self.url(path)), resource, id).await?;
        decode(response).await
    }

    /// Send a request and map non-success statuses to platform errors
    async fn execute(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: impl Display,
    ) -> PlatformResult<Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(status_error(status, resource, id, message))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> PlatformResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| PlatformError::Decode(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> PlatformError {
    if err.is_timeout() {
        PlatformError::Transport("request timed out".to_string())
    } else {
        PlatformError::Transport(err.to_string())
    }
}

fn status_error(
    status: StatusCode,
    resource: &'static str,
    id: impl Display,
    message: String,
) -> PlatformError {
    match status {
        StatusCode::NOT_FOUND => PlatformError::not_found(resource, id),
        StatusCode::FORBIDDEN => PlatformError::Forbidden(message),
        StatusCode::UNAUTHORIZED => PlatformError::Unauthorized,
        _ => PlatformError::Http {
            status: status.as_u16(),
            message,
        },
    }
}
