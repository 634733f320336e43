use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored symptom log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub pain_level: u8,
    pub location: Option<String>,
    pub description: Option<String>,
    pub medications: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new symptom entry.
///
/// `pain_level` is signed so out-of-range values reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntryRequest {
    pub date: String, // YYYY-MM-DD
    pub pain_level: i32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomUpdate {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub pain_level: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
}
