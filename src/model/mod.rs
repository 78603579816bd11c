//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod post;
pub mod query;

// Re-export for convenience
pub use error::{
    AppError, PageFetchError, SourceError, StoreError, SuggestionFetchError, ValidationError,
};
pub use identifiers::{Cursor, Generation, InvalidPostId, PostId};
pub use post::{Post, PostPage, TagOption};
pub use query::{validate, Query, QueryField, RawQuery, SortOrder};
