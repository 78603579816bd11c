//! Error types for boardsearch.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Every error is scoped to the state that produced it and composes via
//! `?` and `From` conversions in the shell.
//!
//! # Error Hierarchy
//!
//! - [`ValidationError`] - malformed search input, surfaced inline next to a field
//! - [`SuggestionFetchError`] - tag completion failure, degrades to an empty list
//! - [`PageFetchError`] - page load failure, replaces the feed with an error state
//! - [`StoreError`] - transport/store failure underlying both fetch errors
//! - [`SourceError`] - fixture file loading for the in-memory backend
//! - [`AppError`] - top-level error for the binary
//!
//! # Recovery Strategy
//!
//! Nothing in the engine is fatal to the process. Validation errors never reach
//! navigation, suggestion errors are swallowed, and page errors persist in the
//! page state until the caller retries or the active query changes.

use super::identifiers::Cursor;
use super::query::QueryField;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error for the command-line shell.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The submitted search was rejected.
    #[error("Invalid search: {0}")]
    Validation(#[from] ValidationError),

    /// Fixture data could not be loaded.
    #[error("Failed to load posts: {0}")]
    Source(#[from] SourceError),

    /// A page of results could not be fetched.
    #[error("Failed to load feed: {0}")]
    PageFetch(#[from] PageFetchError),

    /// Results could not be written out.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Malformed query input.
///
/// Recovered locally: callers show the message next to [`ValidationError::field`]
/// and keep whatever results were already displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Free text was supplied but contains only whitespace.
    #[error("Search text cannot be blank")]
    BlankText,

    /// Sort was neither `asc` nor `desc`.
    #[error("Unknown sort order {value:?}, expected \"asc\" or \"desc\"")]
    InvalidSort {
        /// The rejected literal.
        value: String,
    },

    /// A boolean parameter held something other than `true`/`false`.
    #[error("Invalid value {value:?} for {field}, expected true or false")]
    InvalidFlag {
        /// Offending parameter.
        field: QueryField,
        /// The rejected literal.
        value: String,
    },

    /// A date parameter was not an RFC 3339 timestamp.
    #[error("Invalid timestamp {value:?} for {field}")]
    InvalidTimestamp {
        /// Offending parameter.
        field: QueryField,
        /// The rejected literal.
        value: String,
    },

    /// `to` lies before `from`.
    #[error("Date range ends ({to}) before it starts ({from})")]
    InvertedDateRange {
        /// Start of the rejected range.
        from: chrono::DateTime<chrono::Utc>,
        /// End of the rejected range.
        to: chrono::DateTime<chrono::Utc>,
    },
}

impl ValidationError {
    /// The form field the message belongs to.
    pub fn field(&self) -> QueryField {
        match self {
            Self::BlankText => QueryField::Text,
            Self::InvalidSort { .. } => QueryField::Sort,
            Self::InvalidFlag { field, .. } | Self::InvalidTimestamp { field, .. } => *field,
            Self::InvertedDateRange { .. } => QueryField::DateTo,
        }
    }
}

/// Failure reported by a Post Store or tag endpoint.
///
/// Timeouts are the transport's business; whatever it reports is final for
/// that attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the request.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Transport-level description.
        reason: String,
    },

    /// The cursor does not name an item in the current result order.
    #[error("Unknown cursor {cursor}")]
    UnknownCursor {
        /// The cursor that was sent.
        cursor: Cursor,
    },

    /// The backend answered with something that is not a page.
    #[error("Malformed store response: {reason}")]
    Malformed {
        /// Decode failure details.
        reason: String,
    },
}

/// Tag completion failed. Never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch suggestions for {token:?}: {source}")]
pub struct SuggestionFetchError {
    /// The in-progress token that was queried.
    pub token: String,
    /// Underlying store failure.
    #[source]
    pub source: StoreError,
}

/// A page of results could not be loaded.
///
/// Kept in the page state until a retry or a query change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch page after {cursor}: {source}")]
pub struct PageFetchError {
    /// Cursor of the failed request.
    pub cursor: Cursor,
    /// Underlying store failure.
    #[source]
    pub source: StoreError,
}

/// Errors encountered when loading fixture data for the in-memory store.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The fixture file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Generic I/O error while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixture line is not a valid post record.
    #[error("Invalid record at {path}:{line}: {reason}")]
    Parse {
        /// Fixture file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Decode failure details.
        reason: String,
    },
}
