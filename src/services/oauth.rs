//! External-provider (Google via Supabase) identity handling: exchange the
//! callback code for the authenticated identity, then find-or-create the
//! matching local user record.

use anyhow::Context;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::user::{AuthProvider, User};
use crate::store::{Datastore, UserStore};

#[derive(Debug)]
pub struct OAuthIdentity {
    pub email: String,
    pub display_name: String,
}

/// Exchange the OAuth callback code at the provider's token endpoint and
/// pull the authenticated email + display name out of the response.
pub async fn exchange_code(config: &Config, code: &str) -> anyhow::Result<OAuthIdentity> {
    let (base_url, anon_key) = match (&config.supabase_url, &config.supabase_anon_key) {
        (Some(url), Some(key)) => (url, key),
        _ => anyhow::bail!("OAuth provider is not configured"),
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let token: serde_json::Value = client
        .post(format!("{base_url}/auth/v1/token"))
        .query(&[("grant_type", "authorization_code")])
        .header("apikey", anon_key)
        .json(&serde_json::json!({ "auth_code": code }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let user = &token["user"];
    let email = user["email"]
        .as_str()
        .context("OAuth token response did not include an email")?
        .to_string();

    let display_name = user["user_metadata"]["full_name"]
        .as_str()
        .or_else(|| user["user_metadata"]["name"].as_str())
        .unwrap_or_else(|| email.split('@').next().unwrap_or("user"))
        .to_string();

    Ok(OAuthIdentity {
        email,
        display_name,
    })
}

/// Username derivation for provider-created accounts: lowercase the hint and
/// keep only ASCII alphanumerics.
pub fn derive_username(hint: &str) -> String {
    let name: String = hint
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if name.is_empty() {
        "user".into()
    } else {
        name
    }
}

/// Idempotently find-or-create the user for an external-provider email.
///
/// An existing local account with the same email is migrated to the external
/// provider. New accounts get a username derived from the display-name hint,
/// with an incrementing numeric suffix on collision.
pub async fn reconcile_oauth_identity(
    store: &dyn Datastore,
    email: &str,
    display_name_hint: &str,
) -> AppResult<User> {
    if let Some(user) = store.find_by_email(email).await? {
        if user.auth_provider != AuthProvider::Google {
            store.set_auth_provider(user.id, AuthProvider::Google).await?;
            return Ok(User {
                auth_provider: AuthProvider::Google,
                ..user
            });
        }
        return Ok(user);
    }

    let base = derive_username(display_name_hint);
    let mut username = base.clone();
    let mut suffix = 1u32;
    while store.find_by_username(&username).await?.is_some() {
        username = format!("{base}{suffix}");
        suffix += 1;
    }

    let id = store
        .create_user(&username, email, None, AuthProvider::Google)
        .await?;
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("user record missing after insert")))
}
