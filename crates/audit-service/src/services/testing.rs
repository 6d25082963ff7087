//! In-memory collaborators for service tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use audit_cache::MemoryStore;
use audit_core::{
    AuditLogAction, AuditLogEntry, AuditRecord, Channel, KeyValueStore, Message, Platform,
    PlatformError, PlatformResult, Snowflake, StoreError, StoreResult,
};
use parking_lot::Mutex;

use super::context::ServiceContext;

pub(crate) const GUILD: Snowflake = Snowflake::new(100);
pub(crate) const SINK: Snowflake = Snowflake::new(900);
pub(crate) const GENERAL: Snowflake = Snowflake::new(201);
pub(crate) const LOUNGE: Snowflake = Snowflake::new(301);
pub(crate) const STAGE: Snowflake = Snowflake::new(302);
pub(crate) const ALICE: Snowflake = Snowflake::new(11);
pub(crate) const MODERATOR: Snowflake = Snowflake::new(12);

#[derive(Default)]
struct FakeState {
    channels: HashMap<Snowflake, Channel>,
    messages: HashMap<(Snowflake, Snowflake), Message>,
    audit_entries: Vec<AuditLogEntry>,
    audit_unavailable: bool,
    sends_fail: bool,
    audit_queries: Vec<(Snowflake, AuditLogAction, u8)>,
    records: Vec<(Snowflake, AuditRecord)>,
    texts: Vec<(Snowflake, String)>,
}

/// Platform fake that records everything sent through it
#[derive(Default)]
pub(crate) struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    /// Guild with a text sink, a text channel, and two voice channels
    pub(crate) fn with_guild() -> Self {
        let fake = Self::default();
        fake.add_channel(Channel::new_text(SINK, GUILD, "audit-log"));
        fake.add_channel(Channel::new_text(GENERAL, GUILD, "general"));
        fake.add_channel(Channel::new_voice(LOUNGE, GUILD, "Lounge"));
        fake.add_channel(Channel::new_voice(STAGE, GUILD, "Stage"));
        fake
    }

    pub(crate) fn add_channel(&self, channel: Channel) {
        self.state.lock().channels.insert(channel.id, channel);
    }

    pub(crate) fn remove_channel(&self, id: Snowflake) {
        self.state.lock().channels.remove(&id);
    }

    pub(crate) fn add_message(&self, message: Message) {
        self.state
            .lock()
            .messages
            .insert((message.channel_id, message.id), message);
    }

    pub(crate) fn push_audit_entry(&self, executor: Snowflake, target: Snowflake) {
        let mut state = self.state.lock();
        let id = Snowflake::new(5000 + state.audit_entries.len() as i64);
        state.audit_entries.insert(
            0,
            AuditLogEntry {
                id,
                action_type: AuditLogAction::MemberMove.as_i32(),
                executor_id: Some(executor),
                target_id: Some(target),
            },
        );
    }

    pub(crate) fn set_audit_unavailable(&self) {
        self.state.lock().audit_unavailable = true;
    }

    pub(crate) fn set_sends_fail(&self) {
        self.state.lock().sends_fail = true;
    }

    pub(crate) fn records(&self) -> Vec<(Snowflake, AuditRecord)> {
        self.state.lock().records.clone()
    }

    pub(crate) fn texts(&self) -> Vec<(Snowflake, String)> {
        self.state.lock().texts.clone()
    }

    pub(crate) fn audit_queries(&self) -> Vec<(Snowflake, AuditLogAction, u8)> {
        self.state.lock().audit_queries.clone()
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Message> {
        self.state
            .lock()
            .messages
            .get(&(channel_id, message_id))
            .cloned()
            .ok_or_else(|| PlatformError::not_found("Message", message_id))
    }

    async fn resolve_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>> {
        Ok(self.state.lock().channels.get(&channel_id).cloned())
    }

    async fn recent_audit_entries(
        &self,
        guild_id: Snowflake,
        action: AuditLogAction,
        limit: u8,
    ) -> PlatformResult<Vec<AuditLogEntry>> {
        let mut state = self.state.lock();
        state.audit_queries.push((guild_id, action, limit));
        if state.audit_unavailable {
            return Err(PlatformError::Forbidden("VIEW_AUDIT_LOG".to_string()));
        }
        Ok(state
            .audit_entries
            .iter()
            .filter(|e| e.action() == Some(action))
            .take(usize::from(limit))
            .cloned()
            .collect())
    }

    async fn send_record(&self, channel_id: Snowflake, record: &AuditRecord) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if state.sends_fail {
            return Err(PlatformError::Transport("connection reset".to_string()));
        }
        state.records.push((channel_id, record.clone()));
        Ok(())
    }

    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if state.sends_fail {
            return Err(PlatformError::Transport("connection reset".to_string()));
        }
        state.texts.push((channel_id, content.to_string()));
        Ok(())
    }
}

/// Store whose every operation fails
pub(crate) struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::backend("store offline"))
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::backend("store offline"))
    }
}

/// Context over a fresh fake guild and an empty memory store
pub(crate) fn context() -> (ServiceContext, Arc<FakePlatform>, Arc<MemoryStore>) {
    let platform = Arc::new(FakePlatform::with_guild());
    let store = Arc::new(MemoryStore::new());
    let ctx = ServiceContext::new(platform.clone(), store.clone());
    (ctx, platform, store)
}

/// Context whose guild is already bound to [`SINK`]
pub(crate) async fn bound_context() -> (ServiceContext, Arc<FakePlatform>) {
    let (ctx, platform, store) = context();
    store
        .set(&super::config_store::binding_key(GUILD), &SINK.to_string())
        .await
        .unwrap();
    (ctx, platform)
}
