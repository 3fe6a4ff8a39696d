//! Storage seam. One trait-object interface, two backends (Postgres and
//! MariaDB) selected by the `DATABASE_URL` scheme, so route handlers never
//! know which database they are talking to.

pub mod mysql;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;
use crate::models::user::{AuthProvider, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with `DuplicateIdentity` when the username
    /// or the email is already taken; two separate case-sensitive lookups,
    /// username checked first.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<i64>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Provider migration: a local account that later signs in via OAuth
    /// with the same email is switched to the external provider.
    async fn set_auth_provider(&self, id: i64, provider: AuthProvider) -> AppResult<()>;
}

#[async_trait]
pub trait MoodStore: Send + Sync {
    /// All entries, newest first. Full-table return; no pagination at this
    /// system's expected scale.
    async fn list_moods(&self) -> AppResult<Vec<MoodEntry>>;

    /// `logged_at` is assigned by the database at insert.
    async fn insert_mood(&self, mood: &str, mood_value: i32) -> AppResult<i64>;

    /// Returns false when no row matched.
    async fn delete_mood(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn list_entries(&self, user_id: i64) -> AppResult<Vec<JournalEntry>>;

    async fn insert_entry(&self, user_id: i64, title: &str, content: &str) -> AppResult<i64>;

    /// Scoped delete: a row owned by another user counts as no match, so
    /// the caller cannot distinguish "absent" from "not yours".
    async fn delete_entry(&self, user_id: i64, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait Datastore: UserStore + MoodStore + JournalStore {
    async fn ping(&self) -> AppResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Connect to the backend named by the `DATABASE_URL` scheme and run its
/// migrations.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Datastore>> {
    let url = config.database_url.as_str();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(postgres::PgStore::connect(url).await?))
    } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        // sqlx only understands mysql://; accept the mariadb alias too.
        let url = url.replacen("mariadb://", "mysql://", 1);
        Ok(Arc::new(mysql::MariaDbStore::connect(&url).await?))
    } else {
        anyhow::bail!("DATABASE_URL must use a postgres:// or mysql:// scheme")
    }
}
