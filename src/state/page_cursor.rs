//! Cursor-paginated feed state (pure).
//!
//! A page load is split in two so that no state is borrowed across the network
//! call: [`PageCursor::begin_fetch`] marks the page as loading and hands out a
//! [`PageRequest`]; [`PageCursor::complete_fetch`] folds the store's reply back
//! in. While a request is outstanding `begin_fetch` returns `None`, which is the
//! only guard needed against duplicate or interleaved page loads.
//!
//! Changing the scope (query or endpoint) replaces the page wholesale and bumps
//! an epoch; replies carrying an older epoch are dropped on arrival.

use crate::model::{Cursor, PageFetchError, Post, PostPage, Query, StoreError};
use tracing::{debug, info, warn};

// ===== FeedScope =====

/// Which listing a feed draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FeedEndpoint {
    /// The home feed: every post.
    #[default]
    All,
    /// Posts uploaded by one user.
    Owner(String),
}

/// Everything that identifies one feed lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedScope {
    pub endpoint: FeedEndpoint,
    pub query: Query,
}

impl FeedScope {
    /// Home feed filtered by `query`.
    pub fn new(query: Query) -> Self {
        Self {
            endpoint: FeedEndpoint::All,
            query,
        }
    }

    /// One user's posts filtered by `query`.
    pub fn owned_by(owner: impl Into<String>, query: Query) -> Self {
        Self {
            endpoint: FeedEndpoint::Owner(owner.into()),
            query,
        }
    }
}

// ===== PageState =====

/// Items loaded so far for the active scope.
///
/// Only [`PageCursor`] writes to this; views read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    items: Vec<Post>,
    cursor: Cursor,
    has_more: bool,
    loading: bool,
    error: Option<PageFetchError>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: Cursor::start(),
            has_more: true,
            loading: false,
            error: None,
        }
    }
}

impl PageState {
    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&PageFetchError> {
        self.error.as_ref()
    }

    /// The item a visibility observer should watch.
    pub fn last_item(&self) -> Option<&Post> {
        self.items.last()
    }

    /// Whether another page may be requested right now.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }

    /// How the feed should be presented.
    pub fn status(&self) -> FeedStatus<'_> {
        if let Some(err) = &self.error {
            FeedStatus::Failed(err)
        } else if !self.items.is_empty() {
            FeedStatus::Items {
                items: &self.items,
                loading: self.loading,
            }
        } else if !self.has_more {
            FeedStatus::Empty
        } else {
            FeedStatus::Placeholder
        }
    }
}

/// Presentation summary of a [`PageState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus<'a> {
    /// The last load failed; the error replaces the feed.
    Failed(&'a PageFetchError),
    /// Items to render, with a spinner below them while `loading`.
    Items { items: &'a [Post], loading: bool },
    /// The scope matched nothing.
    Empty,
    /// Nothing loaded yet.
    Placeholder,
}

// ===== Requests / Outcomes =====

/// An outstanding page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    epoch: u64,
    pub scope: FeedScope,
    pub cursor: Cursor,
}

impl PageRequest {
    /// Scope lifetime the request belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of folding a reply into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Items were appended.
    Appended { count: usize, has_more: bool },
    /// The store call failed; the error is now part of the page state.
    Failed(PageFetchError),
    /// The scope changed while the request was in flight; reply dropped.
    Superseded,
}

// ===== PageCursor =====

/// Owner of the paginated result sequence for one view.
#[derive(Debug, Clone)]
pub struct PageCursor {
    scope: FeedScope,
    epoch: u64,
    state: PageState,
}

impl PageCursor {
    pub fn new(scope: FeedScope) -> Self {
        Self {
            scope,
            epoch: 0,
            state: PageState::default(),
        }
    }

    pub fn scope(&self) -> &FeedScope {
        &self.scope
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Make `scope` active, discarding everything loaded so far.
    ///
    /// Any request still in flight becomes superseded.
    pub fn reset(&mut self, scope: FeedScope) {
        self.epoch += 1;
        self.scope = scope;
        self.state = PageState::default();
        info!(epoch = self.epoch, scope = ?self.scope, "feed scope reset");
    }

    /// Start loading the next page.
    ///
    /// Returns `None` (a no-op) while a load is in flight or once the scope
    /// is exhausted. Clears any previous error.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if !self.state.can_load_more() {
            debug!(
                loading = self.state.loading,
                has_more = self.state.has_more,
                "page fetch skipped"
            );
            return None;
        }

        self.state.loading = true;
        self.state.error = None;
        debug!(epoch = self.epoch, cursor = %self.state.cursor, "page fetch started");

        Some(PageRequest {
            epoch: self.epoch,
            scope: self.scope.clone(),
            cursor: self.state.cursor.clone(),
        })
    }

    /// Fold the store's reply to `request` into the page.
    pub fn complete_fetch(
        &mut self,
        request: &PageRequest,
        result: Result<PostPage, StoreError>,
    ) -> FetchOutcome {
        if request.epoch != self.epoch {
            debug!(
                request_epoch = request.epoch,
                current_epoch = self.epoch,
                "page reply for superseded scope dropped"
            );
            return FetchOutcome::Superseded;
        }

        self.state.loading = false;

        match result {
            Ok(page) => {
                let count = page.items.len();
                self.state.items.extend(page.items);
                if let Some(last) = self.state.items.last() {
                    self.state.cursor = Cursor::after(last.key());
                }
                self.state.has_more = page.has_more;
                info!(
                    appended = count,
                    total = self.state.items.len(),
                    has_more = page.has_more,
                    "page loaded"
                );
                FetchOutcome::Appended {
                    count,
                    has_more: page.has_more,
                }
            }
            Err(source) => {
                let err = PageFetchError {
                    cursor: request.cursor.clone(),
                    source,
                };
                warn!(error = %err, "page fetch failed");
                self.state.error = Some(err.clone());
                FetchOutcome::Failed(err)
            }
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "page_cursor_tests.rs"]
mod tests;
