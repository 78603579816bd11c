//! Read-only projections consumed from the Post Store and tag endpoint.

use super::identifiers::{Cursor, PostId};
use serde::{Deserialize, Serialize};

/// A post as listed in a feed. Never mutated by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub public_id: String,
    pub source_url: String,
    pub thumbnail_url: String,
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Post {
    /// Stable key used for cursors and observer attachment.
    pub fn key(&self) -> &PostId {
        &self.id
    }

    /// Route of the single-post detail view.
    pub fn detail_path(&self) -> String {
        format!("/post/{}", self.public_id)
    }
}

/// One page of results returned by the Post Store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<Post>,
    #[serde(default)]
    pub next_cursor: Cursor,
    pub has_more: bool,
}

impl PostPage {
    /// Terminal page with no items.
    pub fn exhausted() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: Cursor::start(),
            has_more: false,
        }
    }
}

/// A tag completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOption {
    pub value: String,
    pub label: String,
}

impl TagOption {
    /// Candidate whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}
