//! Backend collaborators.
//!
//! This module defines the two async seams the engine talks to:
//! - [`PostStore`]: pages of posts for a scope and cursor
//! - [`TagSource`]: tag completions for an in-progress token
//!
//! and an in-memory implementation of both, loadable from JSONL fixtures.
//! The traits are `?Send`: the engine runs on a single cooperative thread.

use crate::model::{Cursor, PostPage, StoreError, TagOption};
use crate::state::FeedScope;
use async_trait::async_trait;

pub mod fixture;
pub mod memory;

pub use fixture::{load_posts, FixtureLoad};
pub use memory::{MemoryPostStore, MemoryTagIndex, StoredPost};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Input of one Post Store read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub scope: FeedScope,
    /// Exclusive bound; empty means "from the start".
    pub cursor: Cursor,
    pub limit: usize,
}

/// Paginated post listing.
///
/// Implementations must define a total order over results and be idempotent
/// for a repeated cursor, so successive pages never repeat or skip an item
/// over a static dataset.
#[async_trait(?Send)]
pub trait PostStore {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PostPage, StoreError>;
}

/// Tag completion endpoint.
#[async_trait(?Send)]
pub trait TagSource {
    /// Completions for `prefix` (at least the configured minimum length).
    async fn suggest(&self, prefix: &str) -> Result<Vec<TagOption>, StoreError>;
}

#[async_trait(?Send)]
impl<S: PostStore + ?Sized> PostStore for std::rc::Rc<S> {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PostPage, StoreError> {
        (**self).fetch_page(query).await
    }
}

#[async_trait(?Send)]
impl<T: TagSource + ?Sized> TagSource for std::rc::Rc<T> {
    async fn suggest(&self, prefix: &str) -> Result<Vec<TagOption>, StoreError> {
        (**self).suggest(prefix).await
    }
}
