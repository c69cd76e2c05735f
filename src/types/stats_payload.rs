use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level fields every stats payload must carry.
pub const REQUIRED_STATS_FIELDS: [&str; 4] = [
    "total_conversations",
    "total_messages",
    "avg_satisfaction",
    "total_intents",
];

/// Dashboard statistics as returned by `GET /api/stats`.
///
/// The analytics behind these numbers live in the backend; the client only
/// validates the shape. List fields that are absent, or present but not
/// arrays, come back empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    /// Number of conversations recorded.
    pub total_conversations: u64,
    /// Number of messages recorded.
    pub total_messages: u64,
    /// Mean feedback rating.
    pub avg_satisfaction: f64,
    /// Number of configured intents.
    pub total_intents: u64,
    /// Messages per intent.
    #[serde(default, deserialize_with = "lenient_list")]
    pub intent_distribution: Vec<IntentCount>,
    /// Messages per day, oldest first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub daily_activity: Vec<DailyActivity>,
    /// Recent conversations.
    #[serde(default, deserialize_with = "lenient_list")]
    pub conversations: Vec<serde_json::Value>,
    /// Intent definitions.
    #[serde(default, deserialize_with = "lenient_list")]
    pub intents: Vec<serde_json::Value>,
    /// Recent feedback entries.
    #[serde(default, deserialize_with = "lenient_list")]
    pub feedback: Vec<serde_json::Value>,
}

/// One bar of the intent distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentCount {
    /// Intent name.
    #[serde(alias = "intent")]
    pub name: String,
    /// Messages matched to the intent.
    pub count: u64,
}

/// One point of the daily activity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Messages on that day.
    pub count: u64,
}

impl StatsPayload {
    /// Parses and validates a stats response body.
    ///
    /// Missing required fields are reported together in one validation
    /// error.
    pub fn parse(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|err| {
            Error::serialization("failed to parse stats response", Some(Box::new(err)))
        })?;
        let Some(object) = value.as_object() else {
            return Err(Error::validation(
                "Stats response is not a JSON object",
                None,
            ));
        };
        let missing: Vec<&str> = REQUIRED_STATS_FIELDS
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(Error::validation(
                format!("Missing required data fields: {}", missing.join(", ")),
                Some(missing.join(",")),
            ));
        }
        serde_json::from_value(value).map_err(|err| {
            Error::serialization("malformed stats response", Some(Box::new(err)))
        })
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}
