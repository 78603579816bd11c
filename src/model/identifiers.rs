//! Core identifier newtypes with smart constructors.
//!
//! Post identifiers validate non-empty strings at construction time.
//! Cursors are opaque and may be empty (meaning "from the start").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key of a post as assigned by the Post Store.
/// [`PostId::new`] is the only way in, so an id is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
    /// Smart constructor: validates non-empty id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidPostId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidPostId::Empty);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostId {
    type Error = InvalidPostId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

/// Opaque page boundary handed back to the Post Store.
///
/// The empty cursor means "from the start"; any other value is the key of
/// the last item already held, used as an exclusive bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Cursor for the first page.
    pub fn start() -> Self {
        Self(String::new())
    }

    /// Wrap a raw cursor value received from a store.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Cursor positioned after the given post.
    pub fn after(id: &PostId) -> Self {
        Self(id.as_str().to_string())
    }

    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_start() {
            f.write_str("<start>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Monotonic tag distinguishing request attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== Error Types =====

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPostId {
    #[error("Post ID cannot be empty")]
    Empty,
}

// ===== Tests =====
