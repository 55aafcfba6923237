use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdcraftError, AdcraftResult};

/// Opaque identifier of a selectable item, as issued by the backing data layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The four independent pools a combination draws one item from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemFlavor {
    Creative,
    Headline,
    PrimaryText,
    Description,
}

impl ItemFlavor {
    pub const ALL: [ItemFlavor; 4] = [
        ItemFlavor::Creative,
        ItemFlavor::Headline,
        ItemFlavor::PrimaryText,
        ItemFlavor::Description,
    ];
}

impl fmt::Display for ItemFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemFlavor::Creative => "creative",
            ItemFlavor::Headline => "headline",
            ItemFlavor::PrimaryText => "primary_text",
            ItemFlavor::Description => "description",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// An uploaded image or video creative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creative {
    pub id: ItemId,
    pub name: String,
    /// Opaque object-storage path; resolved to a display URL by the storage layer.
    pub storage_path: String,
    pub media_type: MediaType,
    pub created_at: DateTime<Utc>,
}

/// The three kinds of ad copy a text item can be.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    Headline,
    PrimaryText,
    Description,
}

impl TextKind {
    pub fn flavor(self) -> ItemFlavor {
        match self {
            TextKind::Headline => ItemFlavor::Headline,
            TextKind::PrimaryText => ItemFlavor::PrimaryText,
            TextKind::Description => ItemFlavor::Description,
        }
    }
}

/// A headline, primary text or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub id: ItemId,
    pub text: String,
    pub kind: TextKind,
    pub created_at: DateTime<Utc>,
}

/// Anything that can be picked into a selection set.
pub trait SelectableItem {
    fn id(&self) -> &ItemId;
    fn flavor(&self) -> ItemFlavor;
}

impl SelectableItem for Creative {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn flavor(&self) -> ItemFlavor {
        ItemFlavor::Creative
    }
}

impl SelectableItem for TextItem {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn flavor(&self) -> ItemFlavor {
        self.kind.flavor()
    }
}

/// Check a list fetched from the data layer before it reaches the combinator:
/// ids must be non-empty and unique, and every item must be of `expected` flavor.
pub fn validate_items<T: SelectableItem>(items: &[T], expected: ItemFlavor) -> AdcraftResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.id().as_str().is_empty() {
            return Err(AdcraftError::Validation(format!(
                "{expected} item with empty id"
            )));
        }
        if item.flavor() != expected {
            return Err(AdcraftError::Validation(format!(
                "item {} is a {}, expected {expected}",
                item.id(),
                item.flavor()
            )));
        }
        if !seen.insert(item.id()) {
            return Err(AdcraftError::Validation(format!(
                "duplicate {expected} id {}",
                item.id()
            )));
        }
    }
    Ok(())
}

/// Who and where committed ads are created for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitContext {
    pub user_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub subproject_id: Option<String>,
}

/// Bulk-insert payload for one ad, as sent to the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAdRecord {
    pub creative_id: ItemId,
    pub headline_id: ItemId,
    pub primary_id: ItemId,
    pub description_id: ItemId,
    pub user_id: String,
    pub project_id: Option<String>,
    pub subproject_id: Option<String>,
}

/// A persisted ad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: NewAdRecord,
    pub created_at: DateTime<Utc>,
}
