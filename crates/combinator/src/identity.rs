//! Deterministic, collision-free keys for ad combinations.
//!
//! Each of the four item ids is written as `<byte length>:<id>` and the four
//! pieces are concatenated in creative, headline, primary text, description
//! order. Because a reader can always recover where one id ends, two distinct
//! 4-tuples can never share a key, whatever characters the ids contain.

use std::fmt;

use adcraft_core::types::ItemId;
use serde::{Deserialize, Serialize};

/// Unique key of one creative × headline × primary text × description tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(String);

impl CombinationId {
    /// Derive the key for a single tuple.
    pub fn derive(
        creative_id: &ItemId,
        headline_id: &ItemId,
        primary_id: &ItemId,
        description_id: &ItemId,
    ) -> Self {
        let mut key = String::new();
        for id in [creative_id, headline_id, primary_id, description_id] {
            key.push_str(&encode_component(id));
        }
        Self(key)
    }

    /// Wrap a key already assembled from [`encode_component`] pieces.
    pub(crate) fn from_encoded(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Length-prefixed encoding of one constituent id.
pub(crate) fn encode_component(id: &ItemId) -> String {
    let raw = id.as_str();
    format!("{}:{}", raw.len(), raw)
}
