//! Infinite-scroll trigger.
//!
//! Exactly one element is observed: the one rendering the last loaded item.
//! Whenever the item list changes the subscription moves to the new last
//! element, so an item that has become interior can never fire a load.
//! The observation mechanism itself sits behind [`ElementObserver`]; the
//! renderer implements it, tests use a recording fake.

use crate::model::{Post, PostId};
use crate::state::page_cursor::PageState;
use tracing::debug;

/// Renderer-side visibility subscription.
pub trait ElementObserver {
    /// Start watching the element that renders `key`.
    fn observe(&mut self, key: &PostId);

    /// Stop watching whatever is currently observed.
    fn disconnect(&mut self);
}

/// Observer for headless use where nothing is ever rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedObserver;

impl ElementObserver for DetachedObserver {
    fn observe(&mut self, _key: &PostId) {}

    fn disconnect(&mut self) {}
}

/// Tracks which element is observed and decides when a signal warrants a load.
#[derive(Debug)]
pub struct VisibilityTrigger<O> {
    observer: O,
    observed: Option<PostId>,
}

impl<O: ElementObserver> VisibilityTrigger<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            observed: None,
        }
    }

    /// Key of the element currently observed.
    pub fn observed(&self) -> Option<&PostId> {
        self.observed.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Move the subscription to the last of `items`.
    ///
    /// Returns true if the subscription changed.
    pub fn sync(&mut self, items: &[Post]) -> bool {
        let last = items.last().map(Post::key);
        if last == self.observed.as_ref() {
            return false;
        }

        if self.observed.take().is_some() {
            self.observer.disconnect();
        }
        if let Some(key) = last {
            self.observer.observe(key);
            self.observed = Some(key.clone());
        }
        debug!(observed = ?self.observed, "visibility observer moved");
        true
    }

    /// Whether a visibility signal for `key` should load the next page.
    ///
    /// Signals from anything but the observed element are ignored, as are
    /// signals while a load is in flight or after the feed is exhausted.
    pub fn should_load(&self, key: &PostId, state: &PageState) -> bool {
        self.observed.as_ref() == Some(key) && state.can_load_more()
    }

    /// Drop the subscription (the view is going away).
    pub fn detach(&mut self) {
        if self.observed.take().is_some() {
            self.observer.disconnect();
        }
    }
}
