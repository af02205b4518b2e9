//! Host-managed items as the overlay sees them.
//!
//! Items are snapshots: the overlay never mutates one in place. Pinning or
//! closing goes through the gateway and only becomes visible after a refetch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque host-assigned identifier.
///
/// Browsers hand out numeric tab ids while other hosts use strings, so any
/// JSON number or string is accepted on the wire and round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    /// Negative or fractional ids, kept exactly as the host sent them.
    OtherNumber(serde_json::Number),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::OtherNumber(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId::Number(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Text(value.to_string())
    }
}

/// One selectable entry (a browser tab).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    /// Icon locator; hosts call this `favIconUrl`.
    #[serde(
        default,
        rename = "favIconUrl",
        alias = "iconRef",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_ref: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon_ref: None,
            pinned: false,
        }
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Title shown in the overlay; untitled tabs fall back to their id.
    pub fn display_title(&self) -> String {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            format!("(untitled {})", self.id)
        } else {
            trimmed.to_string()
        }
    }
}
