//! Engine state machines (pure).
//!
//! All state transitions are plain methods over owned state, testable
//! without a runtime or a backend.

pub mod navigation;
pub mod page_cursor;
pub mod suggestion;
pub mod visibility;

// Re-export for convenience
pub use navigation::{plan_navigation, search_available, Navigation, NavigationMode, SearchForm};
pub use page_cursor::{
    FeedEndpoint, FeedScope, FeedStatus, FetchOutcome, PageCursor, PageRequest, PageState,
};
pub use suggestion::{
    ResponseOutcome, SuggestionMachine, SuggestionPanel, SuggestionPhase, SuggestionRequest,
    SuggestionSettings, SuggestionState, DEFAULT_MIN_TOKEN_LEN,
};
pub use visibility::{DetachedObserver, ElementObserver, VisibilityTrigger};
