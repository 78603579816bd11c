//! Infinite-scroll feed driven against a [`PostStore`].

use crate::model::{PageFetchError, PostId};
use crate::source::{PageQuery, PostStore};
use crate::state::{
    ElementObserver, FeedScope, FetchOutcome, PageCursor, PageState, VisibilityTrigger,
};
use std::cell::RefCell;
use tracing::{debug, info};

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A load was already in flight or the scope is exhausted.
    Skipped,
    /// A page was appended.
    Appended { count: usize, has_more: bool },
    /// The scope changed before the reply arrived; nothing was applied.
    Superseded,
}

/// One view's feed: the page cursor plus the store it reads from.
///
/// Methods take `&self` so several loads can be polled at once; the cursor's
/// loading flag lets only one of them reach the store.
pub struct Feed<S> {
    store: S,
    page_size: usize,
    cursor: RefCell<PageCursor>,
}

impl<S: PostStore> Feed<S> {
    pub fn new(store: S, scope: FeedScope, page_size: usize) -> Self {
        Self {
            store,
            page_size,
            cursor: RefCell::new(PageCursor::new(scope)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn scope(&self) -> FeedScope {
        self.cursor.borrow().scope().clone()
    }

    /// Copy of the current page state.
    pub fn snapshot(&self) -> PageState {
        self.cursor.borrow().state().clone()
    }

    /// Read the page state in place.
    pub fn with_state<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(self.cursor.borrow().state())
    }

    /// Fetch and append the next page.
    ///
    /// # Errors
    ///
    /// Returns the [`PageFetchError`] recorded in the page state when the
    /// store call fails. Loaded items and the cursor are kept.
    pub async fn load_next(&self) -> Result<LoadOutcome, PageFetchError> {
        let request = self.cursor.borrow_mut().begin_fetch();
        let Some(request) = request else {
            return Ok(LoadOutcome::Skipped);
        };

        let query = PageQuery {
            scope: request.scope.clone(),
            cursor: request.cursor.clone(),
            limit: self.page_size,
        };
        let result = self.store.fetch_page(&query).await;

        let outcome = self.cursor.borrow_mut().complete_fetch(&request, result);
        match outcome {
            FetchOutcome::Appended { count, has_more } => {
                Ok(LoadOutcome::Appended { count, has_more })
            }
            FetchOutcome::Failed(err) => Err(err),
            FetchOutcome::Superseded => Ok(LoadOutcome::Superseded),
        }
    }

    /// Switch to `scope` and load its first page.
    ///
    /// The page is emptied before the fetch is issued, and a load still in
    /// flight for the old scope is discarded when it lands.
    ///
    /// # Errors
    ///
    /// Same as [`Feed::load_next`].
    pub async fn change_scope(&self, scope: FeedScope) -> Result<LoadOutcome, PageFetchError> {
        self.cursor.borrow_mut().reset(scope);
        self.load_next().await
    }

    /// Re-issue the load that failed.
    ///
    /// # Errors
    ///
    /// Same as [`Feed::load_next`].
    pub async fn retry(&self) -> Result<LoadOutcome, PageFetchError> {
        let failed = self.with_state(|state| state.error().map(|err| err.cursor.clone()));
        if let Some(cursor) = failed {
            info!(%cursor, "retrying page fetch");
        }
        self.load_next().await
    }

    /// Handle a visibility signal for the element rendering `key`.
    ///
    /// # Errors
    ///
    /// Same as [`Feed::load_next`].
    pub async fn on_visible<O: ElementObserver>(
        &self,
        trigger: &VisibilityTrigger<O>,
        key: &PostId,
    ) -> Result<LoadOutcome, PageFetchError> {
        let fire = self.with_state(|state| trigger.should_load(key, state));
        if !fire {
            debug!(%key, "visibility signal ignored");
            return Ok(LoadOutcome::Skipped);
        }
        self.load_next().await
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
