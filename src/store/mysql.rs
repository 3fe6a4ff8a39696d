use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::error::{AppError, AppResult};
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;
use crate::models::user::{AuthProvider, User};
use crate::store::{Datastore, JournalStore, MoodStore, UserStore};

pub struct MariaDbStore {
    pool: MySqlPool,
}

impl MariaDbStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations/mysql").run(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UserStore for MariaDbStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
        provider: AuthProvider,
    ) -> AppResult<i64> {
        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::DuplicateIdentity("Username already exists".into()));
        }
        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateIdentity("Email already registered".into()));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, auth_provider)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(provider)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_auth_provider(&self, id: i64, provider: AuthProvider) -> AppResult<()> {
        sqlx::query("UPDATE users SET auth_provider = ? WHERE id = ?")
            .bind(provider)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MoodStore for MariaDbStore {
    async fn list_moods(&self) -> AppResult<Vec<MoodEntry>> {
        let moods = sqlx::query_as::<_, MoodEntry>("SELECT * FROM moods ORDER BY logged_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(moods)
    }

    async fn insert_mood(&self, mood: &str, mood_value: i32) -> AppResult<i64> {
        let result = sqlx::query("INSERT INTO moods (mood, mood_value, logged_at) VALUES (?, ?, NOW())")
            .bind(mood)
            .bind(mood_value)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn delete_mood(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM moods WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl JournalStore for MariaDbStore {
    async fn list_entries(&self, user_id: i64) -> AppResult<Vec<JournalEntry>> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn insert_entry(&self, user_id: i64, title: &str, content: &str) -> AppResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO journal_entries (user_id, title, content, created_at)
            VALUES (?, ?, ?, NOW())
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn delete_entry(&self, user_id: i64, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Datastore for MariaDbStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mariadb"
    }
}
