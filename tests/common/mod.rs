//! Shared test harness: an in-memory implementation of the store traits and
//! helpers for driving the router without a database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mindcare_api::config::Config;
use mindcare_api::error::{AppError, AppResult};
use mindcare_api::models::journal::JournalEntry;
use mindcare_api::models::mood::MoodEntry;
use mindcare_api::models::user::{AuthProvider, User};
use mindcare_api::store::{Datastore, JournalStore, MoodStore, UserStore};
use mindcare_api::{router, AppState};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    moods: Mutex<Vec<MoodEntry>>,
    entries: Mutex<Vec<JournalEntry>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<i64> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::DuplicateIdentity("Username already exists".into()));
        }
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateIdentity("Email already registered".into()));
        }

        let id = self.next_id();
        users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.map(String::from),
            auth_provider: provider,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn set_auth_provider(&self, id: i64, provider: AuthProvider) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.auth_provider = provider;
        }
        Ok(())
    }
}

#[async_trait]
impl MoodStore for MemoryStore {
    async fn list_moods(&self) -> AppResult<Vec<MoodEntry>> {
        let mut moods = self.moods.lock().unwrap().clone();
        moods.sort_by(|a, b| (b.logged_at, b.id).cmp(&(a.logged_at, a.id)));
        Ok(moods)
    }

    async fn insert_mood(&self, mood: &str, mood_value: i32) -> AppResult<i64> {
        let id = self.next_id();
        self.moods.lock().unwrap().push(MoodEntry {
            id,
            mood: mood.to_string(),
            mood_value,
            logged_at: Utc::now(),
        });
        Ok(id)
    }

    async fn delete_mood(&self, id: i64) -> AppResult<bool> {
        let mut moods = self.moods.lock().unwrap();
        let before = moods.len();
        moods.retain(|m| m.id != id);
        Ok(moods.len() < before)
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn list_entries(&self, user_id: i64) -> AppResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }

    async fn insert_entry(&self, user_id: i64, title: &str, content: &str) -> AppResult<i64> {
        let id = self.next_id();
        self.entries.lock().unwrap().push(JournalEntry {
            id,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn delete_entry(&self, user_id: i64, id: i64) -> AppResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(entries.len() < before)
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
        jwt_secret: "test-signing-secret".into(),
        jwt_ttl_secs: 604800,
        gemini_api_key: Some("test-key".into()),
        gemini_model: "gemini-2.0-flash".into(),
        supabase_url: None,
        supabase_anon_key: None,
        development: false,
    }
}

pub fn test_app() -> Router {
    test_app_with_config(test_config())
}

pub fn test_app_with_config(config: Config) -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::default()),
        config: Arc::new(config),
    };
    router(state)
}

/// One request through the router; returns status and the parsed JSON body
/// (Null when the body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Sign up a user and return (token, user_id).
pub async fn signup(app: &Router, username: &str, email: &str, password: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["userId"].as_i64().unwrap(),
    )
}
