mod common;

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use mindcare_api::client::cache::{is_local_id, CachedMood, MoodCache};
use mindcare_api::client::chat::ReplySource;
use mindcare_api::client::sync::{ClientError, SyncClient};

/// Serve the router with the in-memory store on an ephemeral port.
async fn spawn_server() -> String {
    let app = common::test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Nothing listens here; connections are refused immediately, which is the
/// pure-transport failure the sync layer falls back on.
const DEAD_SERVER: &str = "http://127.0.0.1:9";

fn temp_cache() -> (PathBuf, MoodCache) {
    let dir = std::env::temp_dir().join(format!("mindcare-sync-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let cache = MoodCache::new(&dir);
    (dir, cache)
}

#[tokio::test]
async fn online_write_merges_the_server_id() {
    let base = spawn_server().await;
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(base.as_str(), cache);

    let entry = client.log_mood("happy").await.unwrap();
    assert!(entry.synced);
    assert!(!is_local_id(&entry.id));
    assert!(entry.id.parse::<i64>().is_ok());
    assert_eq!(entry.mood_value, 5);

    let history = client.load_moods().await.unwrap();
    assert!(!history.offline);
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].mood, "happy");
    assert_eq!(history.entries[0].mood_value, 5);

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn offline_write_is_kept_under_a_local_id() {
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(DEAD_SERVER, cache);

    let entry = client.log_mood("sad").await.unwrap();
    assert!(!entry.synced);
    assert!(is_local_id(&entry.id));
    assert_eq!(entry.mood_value, 3);

    // The write shows up immediately in the rendered history.
    let history = client.load_moods().await.unwrap();
    assert!(history.offline);
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].id, entry.id);

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn offline_read_serves_the_last_known_cache() {
    let (dir, cache) = temp_cache();
    let seeded = vec![CachedMood {
        id: "41".into(),
        mood: "neutral".into(),
        mood_value: 4,
        logged_at: Utc::now(),
        synced: true,
    }];
    cache.save(&seeded).unwrap();

    let client = SyncClient::new(DEAD_SERVER, cache);
    let history = client.load_moods().await.unwrap();
    assert!(history.offline);
    assert_eq!(history.entries, seeded);

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn a_successful_refresh_replaces_unsynced_entries_wholesale() {
    let base = spawn_server().await;
    let (dir, cache) = temp_cache();

    // One entry written while "offline"...
    let offline_client = SyncClient::new(DEAD_SERVER, cache);
    let local = offline_client.log_mood("anxious").await.unwrap();
    assert!(is_local_id(&local.id));

    // ...then the network comes back: one real write and a refresh.
    let online_client = SyncClient::new(base.as_str(), MoodCache::new(&dir));
    online_client.log_mood("happy").await.unwrap();

    let history = online_client.load_moods().await.unwrap();
    assert!(!history.offline);
    // The local-only entry is neither resubmitted nor duplicated; the
    // server copy is the whole truth.
    assert_eq!(history.entries.len(), 1);
    assert!(history.entries.iter().all(|m| !is_local_id(&m.id)));

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn deleting_a_local_entry_never_touches_the_server() {
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(DEAD_SERVER, cache);

    let entry = client.log_mood("angry").await.unwrap();
    client.delete_mood(&entry.id).await.unwrap();

    assert!(MoodCache::new(&dir).load().is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn remote_delete_failure_never_blocks_local_removal() {
    let (dir, cache) = temp_cache();
    cache
        .save(&[CachedMood {
            id: "12345".into(),
            mood: "happy".into(),
            mood_value: 5,
            logged_at: Utc::now(),
            synced: true,
        }])
        .unwrap();

    let client = SyncClient::new(DEAD_SERVER, cache);
    client.delete_mood("12345").await.unwrap();

    assert!(MoodCache::new(&dir).load().is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn online_delete_removes_the_server_row() {
    let base = spawn_server().await;
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(base.as_str(), cache);

    let entry = client.log_mood("happy").await.unwrap();
    client.delete_mood(&entry.id).await.unwrap();

    let history = client.load_moods().await.unwrap();
    assert!(!history.offline);
    assert!(history.entries.is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn chat_falls_back_to_canned_replies_offline() {
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(DEAD_SERVER, cache);

    let reply = client.send_message("I'm feeling anxious").await.unwrap();
    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(reply.reply.contains("breath"));

    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn server_reported_chat_errors_surface_verbatim() {
    let base = spawn_server().await;
    let (dir, cache) = temp_cache();
    let client = SyncClient::new(base.as_str(), cache);

    // An empty message is rejected by the server before any upstream call;
    // a business error must not trigger the offline fallback.
    let err = client.send_message("   ").await.unwrap_err();
    match err {
        ClientError::Server(message) => assert_eq!(message, "Message is required"),
        other => panic!("expected a server error, got {other:?}"),
    }

    fs::remove_dir_all(dir).unwrap();
}
