//! In-memory Post Store and tag index.
//!
//! Backs the command-line tool and integration tests. Results are totally
//! ordered by `(created_at, id)`: newest first unless ascending order is
//! requested. The cursor is the id of the last item already returned and is
//! exclusive.

use super::{PageQuery, PostStore, TagSource};
use crate::model::{Cursor, Post, PostPage, Query, SortOrder, StoreError, TagOption};
use crate::state::{FeedEndpoint, FeedScope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A post plus the fields the store filters and orders on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPost {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredPost {
    fn matches(&self, scope: &FeedScope) -> bool {
        let owner_ok = match &scope.endpoint {
            FeedEndpoint::All => true,
            FeedEndpoint::Owner(owner) => self.post.owner_id.as_deref() == Some(owner.as_str()),
        };
        owner_ok && scope.query.covers(self.created_at) && self.matches_tags(&scope.query)
    }

    /// Strict: every query tag equals one of the post's tags.
    /// Lenient: some query tag occurs inside one of the post's tags.
    fn matches_tags(&self, query: &Query) -> bool {
        let wanted: Vec<String> = query.tags().iter().map(|t| t.to_lowercase()).collect();
        if wanted.is_empty() {
            return true;
        }
        let own: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();

        if query.is_strict() {
            wanted.iter().all(|w| own.iter().any(|tag| tag == w))
        } else {
            wanted
                .iter()
                .any(|w| own.iter().any(|tag| tag.contains(w.as_str())))
        }
    }
}

// ===== MemoryPostStore =====

/// Post Store over a fixed set of records.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostStore {
    /// Sorted ascending by `(created_at, id)`.
    records: Vec<StoredPost>,
}

impl MemoryPostStore {
    pub fn new(mut records: Vec<StoredPost>) -> Self {
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.post.id.cmp(&b.post.id))
        });
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StoredPost] {
        &self.records
    }

    /// Every record in `scope`, in result order.
    pub fn ordered(&self, scope: &FeedScope) -> Vec<&StoredPost> {
        let matching = self.records.iter().filter(|record| record.matches(scope));
        match scope.query.sort() {
            Some(SortOrder::Ascending) => matching.collect(),
            Some(SortOrder::Descending) | None => matching.rev().collect(),
        }
    }

    /// Synchronous page read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownCursor`] if the cursor names no item in
    /// the scope's result order.
    pub fn page(&self, query: &PageQuery) -> Result<PostPage, StoreError> {
        let ordered = self.ordered(&query.scope);

        let start = if query.cursor.is_start() {
            0
        } else {
            ordered
                .iter()
                .position(|record| record.post.id.as_str() == query.cursor.as_str())
                .map(|index| index + 1)
                .ok_or_else(|| StoreError::UnknownCursor {
                    cursor: query.cursor.clone(),
                })?
        };

        let limit = query.limit.max(1);
        let items: Vec<Post> = ordered
            .iter()
            .skip(start)
            .take(limit)
            .map(|record| record.post.clone())
            .collect();
        let has_more = start + items.len() < ordered.len();
        let next_cursor = items
            .last()
            .map(|post| Cursor::after(post.key()))
            .unwrap_or_default();

        Ok(PostPage {
            items,
            next_cursor,
            has_more,
        })
    }
}

#[async_trait(?Send)]
impl PostStore for MemoryPostStore {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PostPage, StoreError> {
        self.page(query)
    }
}

// ===== MemoryTagIndex =====

/// Distinct tags answering prefix completions.
#[derive(Debug, Clone, Default)]
pub struct MemoryTagIndex {
    tags: BTreeSet<String>,
    limit: usize,
}

impl MemoryTagIndex {
    pub fn new(tags: impl IntoIterator<Item = String>, limit: usize) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            limit,
        }
    }

    /// Index every tag used by `records`.
    pub fn from_records(records: &[StoredPost], limit: usize) -> Self {
        Self::new(
            records.iter().flat_map(|record| record.tags.iter().cloned()),
            limit,
        )
    }

    /// Case-insensitive prefix matches in lexical order, capped at the limit.
    pub fn lookup(&self, prefix: &str) -> Vec<TagOption> {
        let prefix = prefix.to_lowercase();
        self.tags
            .iter()
            .filter(|tag| tag.to_lowercase().starts_with(&prefix))
            .take(self.limit)
            .map(|tag| TagOption::plain(tag.clone()))
            .collect()
    }
}

#[async_trait(?Send)]
impl TagSource for MemoryTagIndex {
    async fn suggest(&self, prefix: &str) -> Result<Vec<TagOption>, StoreError> {
        Ok(self.lookup(prefix))
    }
}
