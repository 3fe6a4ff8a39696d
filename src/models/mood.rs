use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: i64,
    pub mood: String,
    pub mood_value: i32,
    /// Server-assigned at insert; client-supplied timestamps are ignored.
    pub logged_at: DateTime<Utc>,
}

/// Canonical label → value map shared with the sync client. The server only
/// validates the 1-5 range; the map is the client's derivation rule.
pub const MOOD_LABELS: &[(&str, i32)] = &[
    ("angry", 1),
    ("anxious", 2),
    ("sad", 3),
    ("neutral", 4),
    ("happy", 5),
];

pub fn mood_value_for(label: &str) -> i32 {
    MOOD_LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, value)| *value)
        .unwrap_or(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values() {
        assert_eq!(mood_value_for("angry"), 1);
        assert_eq!(mood_value_for("anxious"), 2);
        assert_eq!(mood_value_for("sad"), 3);
        assert_eq!(mood_value_for("neutral"), 4);
        assert_eq!(mood_value_for("happy"), 5);
    }

    #[test]
    fn unknown_label_falls_back_to_midpoint() {
        assert_eq!(mood_value_for("mysterious"), 3);
    }
}
