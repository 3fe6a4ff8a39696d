use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::cache::{is_local_id, new_local_id, CachedMood, MoodCache};
use crate::models::mood::mood_value_for;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered and reported a failure; shown verbatim. Distinct
    /// from transport failures, which fall back to the cache instead.
    #[error("{0}")]
    Server(String),

    #[error("cache write failed: {0}")]
    Cache(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct MoodHistory {
    pub entries: Vec<CachedMood>,
    /// True when the history came from the local cache because the server
    /// was unreachable. Cleared by the next successful read.
    pub offline: bool,
}

#[derive(Debug, Deserialize)]
struct ServerMood {
    id: i64,
    mood: String,
    mood_value: i32,
    logged_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MoodListBody {
    success: bool,
    #[serde(default)]
    data: Vec<ServerMood>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    success: bool,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

pub struct SyncClient {
    pub(super) base_url: String,
    pub(super) http: reqwest::Client,
    cache: MoodCache,
}

impl SyncClient {
    pub fn new(base_url: impl Into<String>, cache: MoodCache) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            cache,
        }
    }

    /// Fetch the mood history. On success the local cache is overwritten
    /// wholesale (the server copy wins, unsynced local entries included).
    /// A transport failure (not an HTTP error status) serves the
    /// last-known cache and flips the offline flag.
    pub async fn load_moods(&self) -> Result<MoodHistory, ClientError> {
        let response = match self
            .http
            .get(format!("{}/api/moods", self.base_url))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_transport_error(&e) => {
                tracing::warn!(error = %e, "mood fetch failed; serving cached history");
                return Ok(MoodHistory {
                    entries: self.cache.load(),
                    offline: true,
                });
            }
            Err(e) => return Err(ClientError::Server(e.to_string())),
        };

        let body: MoodListBody = response
            .json()
            .await
            .map_err(|e| ClientError::Server(e.to_string()))?;
        if !body.success {
            return Err(ClientError::Server(
                body.error.unwrap_or_else(|| "Failed to fetch moods".into()),
            ));
        }

        let entries: Vec<CachedMood> = body
            .data
            .into_iter()
            .map(|m| CachedMood {
                id: m.id.to_string(),
                mood: m.mood,
                mood_value: m.mood_value,
                logged_at: m.logged_at,
                synced: true,
            })
            .collect();
        self.cache.save(&entries)?;

        Ok(MoodHistory {
            entries,
            offline: false,
        })
    }

    /// Log a mood. The value is derived from the canonical label map. The
    /// entry always lands in the cache: with the server-assigned id when the
    /// write went through, under a fresh `local-` id marked unsynced when
    /// the server was unreachable.
    pub async fn log_mood(&self, mood: &str) -> Result<CachedMood, ClientError> {
        let mood_value = mood_value_for(mood);
        let payload = serde_json::json!({ "mood": mood, "mood_value": mood_value });

        let entry = match self
            .http
            .post(format!("{}/api/moods", self.base_url))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => {
                let body: CreatedBody = response
                    .json()
                    .await
                    .map_err(|e| ClientError::Server(e.to_string()))?;
                match (body.success, body.id) {
                    (true, Some(id)) => CachedMood {
                        id: id.to_string(),
                        mood: mood.into(),
                        mood_value,
                        logged_at: Utc::now(),
                        synced: true,
                    },
                    _ => {
                        return Err(ClientError::Server(
                            body.error.unwrap_or_else(|| "Failed to log mood".into()),
                        ))
                    }
                }
            }
            Err(e) if is_transport_error(&e) => {
                tracing::warn!(error = %e, "mood write failed; keeping a local-only entry");
                CachedMood {
                    id: new_local_id(),
                    mood: mood.into(),
                    mood_value,
                    logged_at: Utc::now(),
                    synced: false,
                }
            }
            Err(e) => return Err(ClientError::Server(e.to_string())),
        };

        let mut entries = self.cache.load();
        entries.insert(0, entry.clone());
        self.cache.save(&entries)?;

        Ok(entry)
    }

    /// Delete an entry. Local removal always happens. The remote delete is
    /// attempted only for ids the server could actually know (`local-` ids
    /// are skipped), and a remote failure is logged, never propagated.
    pub async fn delete_mood(&self, id: &str) -> Result<(), ClientError> {
        let mut entries = self.cache.load();
        entries.retain(|m| m.id != id);
        self.cache.save(&entries)?;

        if is_local_id(id) {
            return Ok(());
        }

        if let Err(e) = self.remote_delete(id).await {
            tracing::warn!(id, error = %e, "remote mood delete failed; entry removed locally");
        }
        Ok(())
    }

    async fn remote_delete(&self, id: &str) -> anyhow::Result<()> {
        let response = self
            .http
            .delete(format!("{}/api/moods/{}", self.base_url, id))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("server returned {}", response.status());
        }
        Ok(())
    }
}

pub(super) fn is_transport_error(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request()
}
