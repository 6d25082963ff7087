//! REST adapter tests
//!
//! Drive `PlatformClient` against the mock platform over real HTTP.
//!
//! Run with: cargo test -p integration-tests --test platform_client_tests

use std::time::Duration;

use audit_core::{AuditLogAction, AuditRecord, Platform, PlatformError, RecordColor};
use audit_gateway::{PlatformClient, RestClient, RestConfig, StateCache};
use chrono::Utc;
use integration_tests::{fixtures::*, MockPlatform};

fn client(mock: &MockPlatform, token: &str) -> PlatformClient {
    let rest = RestClient::new(&RestConfig {
        base_url: mock.api_url(),
        token: token.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build REST client");
    PlatformClient::new(rest, StateCache::new_shared(10))
}

async fn start() -> MockPlatform {
    let mock = MockPlatform::start().await.expect("Failed to start mock platform");
    mock.add_guild(guild_create());
    mock
}

// ============================================================================
// Credential Tests
// ============================================================================

#[tokio::test]
async fn test_current_user_with_valid_token() {
    let mock = start().await;
    let user = client(&mock, BOT_TOKEN).rest().current_user().await.unwrap();

    assert_eq!(user.id, BOT_USER);
    assert!(user.bot);
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let mock = start().await;
    let err = client(&mock, "wrong-token")
        .rest()
        .current_user()
        .await
        .unwrap_err();

    assert!(matches!(err, PlatformError::Unauthorized));
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_channel_over_rest() {
    let mock = start().await;
    let channel = client(&mock, BOT_TOKEN)
        .resolve_channel(LOUNGE)
        .await
        .unwrap()
        .expect("channel should exist");

    assert_eq!(channel.display_name(), "Lounge");
    assert!(channel.is_voice());
    assert_eq!(channel.guild_id, Some(GUILD));
}

#[tokio::test]
async fn test_resolved_channel_is_cached() {
    let mock = start().await;
    let client = client(&mock, BOT_TOKEN);

    client.resolve_channel(GENERAL).await.unwrap();
    mock.remove_channel(GENERAL);

    let cached = client.resolve_channel(GENERAL).await.unwrap();
    assert_eq!(cached.map(|c| c.id), Some(GENERAL));
}

#[tokio::test]
async fn test_unknown_channel_resolves_to_none() {
    let mock = start().await;
    let channel = client(&mock, BOT_TOKEN)
        .resolve_channel(unique_id())
        .await
        .unwrap();

    assert!(channel.is_none());
}

#[tokio::test]
async fn test_fetch_message() {
    let mock = start().await;
    let message = text_message(GENERAL, ALICE, "hello there");
    mock.add_message(message.clone());

    let fetched = client(&mock, BOT_TOKEN)
        .fetch_message(GENERAL, message.id)
        .await
        .unwrap();

    assert!(!fetched.partial);
    assert_eq!(fetched.author_id, Some(ALICE));
    assert_eq!(fetched.text(), Some("hello there"));
}

#[tokio::test]
async fn test_fetch_missing_message_is_not_found() {
    let mock = start().await;
    let err = client(&mock, BOT_TOKEN)
        .fetch_message(GENERAL, unique_id())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_recent_audit_entries_newest_first() {
    let mock = start().await;
    mock.push_audit_entry(GUILD, move_entry(ALICE, ALICE));
    mock.push_audit_entry(GUILD, move_entry(MODERATOR, ALICE));

    let entries = client(&mock, BOT_TOKEN)
        .recent_audit_entries(GUILD, AuditLogAction::MemberMove, 1)
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].executor_id, Some(MODERATOR));
    assert_eq!(entries[0].action(), Some(AuditLogAction::MemberMove));
}

// ============================================================================
// Delivery Tests
// ============================================================================

#[tokio::test]
async fn test_send_record_posts_embed() {
    let mock = start().await;
    let record = AuditRecord::new("Channel Created", RecordColor::Green, Utc::now())
        .with_field("Channel Name", "news", false)
        .with_field("Channel Type", "Text Channel", false);

    client(&mock, BOT_TOKEN).send_record(LOGS, &record).await.unwrap();

    let posted = mock.posted_to(LOGS);
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].title(), Some("Channel Created"));
    assert_eq!(posted[0].field("Channel Name"), Some("news"));
    assert_eq!(posted[0].color(), Some(0x00FF00));
    assert!(posted[0].content.is_none());
}

#[tokio::test]
async fn test_send_text_posts_content() {
    let mock = start().await;
    client(&mock, BOT_TOKEN).send_text(LOGS, "ping").await.unwrap();

    let posted = mock.posted_to(LOGS);
    assert_eq!(posted[0].content.as_deref(), Some("ping"));
    assert!(posted[0].embeds.is_empty());
}

#[tokio::test]
async fn test_send_to_forbidden_channel() {
    let mock = start().await;
    mock.forbid_channel(LOGS);

    let err = client(&mock, BOT_TOKEN).send_text(LOGS, "ping").await.unwrap_err();

    assert!(matches!(err, PlatformError::Forbidden(ref m) if m == "Missing Access"));
    assert!(mock.posted().is_empty());
}
