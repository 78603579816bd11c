//! Shared fixtures and fakes for unit tests.
//!
//! Posts are keyed `p{n}`. The scripted backends record every call and can
//! delay replies so tests running on paused time control arrival order.

use crate::model::{Post, PostId, PostPage, StoreError, TagOption};
use crate::source::{PageQuery, PostStore, StoredPost, TagSource};
use crate::state::ElementObserver;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ops::RangeInclusive;
use std::time::Duration;

// ===== Posts =====

pub fn post(n: u32) -> Post {
    Post {
        id: PostId::new(format!("p{n}")).expect("non-empty id"),
        public_id: format!("pub{n}"),
        source_url: format!("https://img.example/{n}.jpg"),
        thumbnail_url: format!("https://img.example/{n}_thumb.jpg"),
        owner_id: None,
    }
}

pub fn posts(range: RangeInclusive<u32>) -> Vec<Post> {
    range.map(post).collect()
}

pub fn page(items: Vec<Post>, has_more: bool) -> PostPage {
    let next_cursor = items
        .last()
        .map(|p| crate::model::Cursor::after(p.key()))
        .unwrap_or_default();
    PostPage {
        items,
        next_cursor,
        has_more,
    }
}

pub fn unavailable() -> StoreError {
    StoreError::Unavailable {
        reason: "connection reset".to_string(),
    }
}

/// Post `n` created `day` days after 2024-01-01.
pub fn stored(n: u32, tags: &[&str], day: i64, owner: Option<&str>) -> StoredPost {
    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid date");
    let mut post = post(n);
    post.owner_id = owner.map(str::to_string);
    StoredPost {
        post,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: epoch + ChronoDuration::days(day),
    }
}

// ===== Observer =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    Observe(PostId),
    Disconnect,
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl ElementObserver for RecordingObserver {
    fn observe(&mut self, key: &PostId) {
        self.events.push(ObserverEvent::Observe(key.clone()));
    }

    fn disconnect(&mut self) {
        self.events.push(ObserverEvent::Disconnect);
    }
}

// ===== Scripted backends =====

/// Post Store answering calls from a queue of `(delay, reply)` pairs.
///
/// Once the queue runs dry every call gets an exhausted page.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    replies: RefCell<VecDeque<(Duration, Result<PostPage, StoreError>)>>,
    calls: RefCell<Vec<PageQuery>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, delay: Duration, result: Result<PostPage, StoreError>) -> Self {
        self.replies.borrow_mut().push_back((delay, result));
        self
    }

    pub fn calls(&self) -> Vec<PageQuery> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl PostStore for ScriptedStore {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PostPage, StoreError> {
        self.calls.borrow_mut().push(query.clone());
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(PostPage::exhausted()),
        }
    }
}

/// Tag source with a per-prefix delay and reply.
///
/// Unscripted prefixes answer immediately with no candidates.
#[derive(Debug, Default)]
pub struct ScriptedTags {
    replies: HashMap<String, (Duration, Result<Vec<TagOption>, StoreError>)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, prefix: &str, delay: Duration, values: &[&str]) -> Self {
        let options = values.iter().map(|v| TagOption::plain(*v)).collect();
        self.replies.insert(prefix.to_string(), (delay, Ok(options)));
        self
    }

    pub fn fail(mut self, prefix: &str, delay: Duration) -> Self {
        self.replies
            .insert(prefix.to_string(), (delay, Err(unavailable())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl TagSource for ScriptedTags {
    async fn suggest(&self, prefix: &str) -> Result<Vec<TagOption>, StoreError> {
        self.calls.borrow_mut().push(prefix.to_string());
        match self.replies.get(prefix) {
            Some((delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Ok(Vec::new()),
        }
    }
}
