//! Upstream text-generation provider. One request out, one reply back; any
//! failure is classified into a user-facing category by substring matching
//! against the provider's error text. Brittle on purpose: the matching and
//! its priority order are part of the client-visible contract.

use crate::config::Config;
use crate::error::AppError;

pub const SYSTEM_PROMPT: &str = "You are MindCare, a friendly and empathetic mental health assistant.\nProvide supportive, non-judgmental responses.\nIf someone is in crisis, encourage them to seek professional help.\nKeep responses concise and helpful.";

pub fn build_prompt(message: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nUser: {message}\n\nMindCare:")
}

/// The provider's error signal: an HTTP status when one was received, plus
/// whatever error text we could extract.
#[derive(Debug)]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

/// Send the prompt to Gemini and return the generated text, trimmed.
pub async fn generate(config: &Config, prompt: &str) -> Result<String, ProviderError> {
    let Some(api_key) = config.gemini_api_key.as_deref() else {
        return Err(ProviderError {
            status: None,
            message: "Gemini API key is not configured".into(),
        });
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| ProviderError {
            status: None,
            message: e.to_string(),
        })?;

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
        config.gemini_model
    );

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        }))
        .send()
        .await
        .map_err(|e| ProviderError {
            status: None,
            message: if e.is_connect() || e.is_timeout() {
                format!("network error: {e}")
            } else {
                e.to_string()
            },
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError {
            status: Some(status.as_u16()),
            message: body,
        });
    }

    let payload: serde_json::Value = response.json().await.map_err(|e| ProviderError {
        status: None,
        message: e.to_string(),
    })?;

    let reply = payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ProviderError {
            status: None,
            message: "Invalid response from Gemini API: No text returned".into(),
        })?;

    Ok(reply)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Quota,
    RateLimit,
    Auth,
    Network,
    Other,
}

type Predicate = fn(Option<u16>, &str) -> bool;

/// Priority-ordered: the first matching predicate wins, even when a message
/// also matches a lower-priority one. Client-visible status codes depend on
/// this order.
pub const CLASSIFIERS: &[(Predicate, FailureKind)] = &[
    (is_quota, FailureKind::Quota),
    (is_rate_limit, FailureKind::RateLimit),
    (is_auth, FailureKind::Auth),
    (is_network, FailureKind::Network),
];

fn is_quota(status: Option<u16>, message: &str) -> bool {
    status == Some(429) || message.contains("quota") || message.contains("Quota")
}

fn is_rate_limit(_status: Option<u16>, message: &str) -> bool {
    message.contains("rate limit") || message.contains("Rate limit")
}

fn is_auth(status: Option<u16>, message: &str) -> bool {
    matches!(status, Some(401) | Some(403))
        || message.contains("API key")
        || message.contains("API_KEY")
}

fn is_network(_status: Option<u16>, message: &str) -> bool {
    message.contains("network") || message.contains("Network") || message.contains("fetch")
}

pub fn classify(error: &ProviderError) -> FailureKind {
    CLASSIFIERS
        .iter()
        .find(|(matches, _)| matches(error.status, &error.message))
        .map(|(_, kind)| *kind)
        .unwrap_or(FailureKind::Other)
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        match classify(&error) {
            FailureKind::Quota => AppError::QuotaExceeded(error.message),
            FailureKind::RateLimit => AppError::RateLimited(error.message),
            FailureKind::Auth => AppError::UpstreamAuth(error.message),
            FailureKind::Network => AppError::UpstreamUnavailable(error.message),
            FailureKind::Other => AppError::Upstream(error.message),
        }
    }
}
