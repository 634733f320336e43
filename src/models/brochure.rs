use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::SectionKind;

/// One checkable line of aftercare guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrochureItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<BrochureItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrochureSection {
    pub id: String,
    pub title: String,
    pub kind: SectionKind,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BrochureSection {
    /// All items of the section, across content blocks, in display order.
    pub fn items(&self) -> impl Iterator<Item = &BrochureItem> {
        self.content.iter().flat_map(|block| block.items.iter())
    }
}

/// Persisted completion state for one `(section_id, item_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    pub section_id: String,
    pub content_block_id: String,
    pub item_id: String,
    pub completed: bool,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Item-level update sent by the checklist screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub section_id: String,
    pub item_id: String,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}
