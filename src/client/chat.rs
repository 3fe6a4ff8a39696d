//! Chat proxy with an offline fallback: when the server is unreachable the
//! client answers from a small canned-reply table keyed by keyword matching,
//! so the chatbot page stays usable without a network.

use serde::Deserialize;

use crate::client::sync::{is_transport_error, ClientError, SyncClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Relayed from the text-generation provider.
    Assistant,
    /// Canned offline reply chosen by keyword match.
    Fallback,
}

#[derive(Debug)]
pub struct ChatReply {
    pub reply: String,
    pub source: ReplySource,
}

/// First keyword contained in the (lowercased) message wins.
pub const FALLBACK_REPLIES: &[(&str, &str)] = &[
    (
        "anxi",
        "Feeling anxious is hard. Try a slow breath: in for four counts, hold for four, out for four. You're doing better than you think.",
    ),
    (
        "sad",
        "I'm sorry you're feeling down. It's okay to sit with sadness for a while. Consider writing about it in your journal, or reaching out to someone you trust.",
    ),
    (
        "stress",
        "Stress builds up quietly. A short walk or a few minutes away from the screen can help reset. What's one small thing you could set aside for now?",
    ),
    (
        "sleep",
        "Rest matters a lot for mood. Try winding down without screens for half an hour before bed, and keep a consistent time if you can.",
    ),
    (
        "lonely",
        "Loneliness is heavy. Even a small connection, a message to a friend or a walk somewhere with people around, can soften it a little.",
    ),
];

pub const DEFAULT_FALLBACK: &str =
    "I'm offline right now, but I'm still here. Logging your mood or writing a short journal entry can help until I'm back online.";

pub fn fallback_reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    FALLBACK_REPLIES
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_FALLBACK)
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    success: bool,
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SyncClient {
    /// Relay one message through the server. A transport failure answers
    /// from the canned table; a server-reported error surfaces verbatim.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply, ClientError> {
        let message = message.trim();

        let response = match self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_transport_error(&e) => {
                tracing::warn!(error = %e, "chat relay unreachable; using canned reply");
                return Ok(ChatReply {
                    reply: fallback_reply(message).into(),
                    source: ReplySource::Fallback,
                });
            }
            Err(e) => return Err(ClientError::Server(e.to_string())),
        };

        let body: ChatBody = response
            .json()
            .await
            .map_err(|e| ClientError::Server(e.to_string()))?;

        match (body.success, body.reply) {
            (true, Some(reply)) => Ok(ChatReply {
                reply,
                source: ReplySource::Assistant,
            }),
            _ => Err(ClientError::Server(
                body.error
                    .unwrap_or_else(|| "Invalid response from server".into()),
            )),
        }
    }
}
