//! Async shell around the pure state machines.
//!
//! Everything here runs on one cooperative thread. Mutable state sits in a
//! `RefCell` and is only borrowed between suspension points; the store and
//! tag source are the only things awaited.

pub mod feed;
pub mod suggestions;

pub use feed::{Feed, LoadOutcome};
pub use suggestions::{
    suggestion_pipeline, SuggestionHandle, SuggestionInput, SuggestionSnapshot, SuggestionWorker,
};
