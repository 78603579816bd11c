//! Search request model and its validator.
//!
//! `RawQuery` is whatever the search form collected; `Query` is the validated,
//! canonical form. The only way to obtain a `Query` with fields set is
//! [`validate`], so every `Query` upholds:
//! - `text`, if present, is non-empty and trimmed
//! - `date_to >= date_from` when both are present
//! - timestamps carry at most millisecond precision
//! - timestamps fall in years 0000 to 9999, so they render fixed width

use super::error::ValidationError;
use crate::parser::{params, tokens};
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;

// ===== SortOrder =====

/// Result ordering requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortOrder {
    /// Literal used in navigation parameters.
    pub const fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Map a filter-menu selection to a sort order.
    ///
    /// Anything unrecognised clears the selection instead of failing.
    pub fn from_selection(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(ValidationError::InvalidSort {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

// ===== QueryField =====

/// Identifies a search form field / navigation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Text,
    Strict,
    Sort,
    DateFrom,
    DateTo,
}

impl QueryField {
    /// All fields in canonical parameter order.
    pub const ALL: [QueryField; 5] = [
        QueryField::Text,
        QueryField::Strict,
        QueryField::Sort,
        QueryField::DateFrom,
        QueryField::DateTo,
    ];

    /// Navigation parameter key for this field.
    pub const fn param_name(self) -> &'static str {
        match self {
            QueryField::Text => "query",
            QueryField::Strict => "strict",
            QueryField::Sort => "sort",
            QueryField::DateFrom => "from",
            QueryField::DateTo => "to",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

// ===== RawQuery =====

/// Unvalidated search form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    /// Contents of the search box. `None` and `""` both mean "no text".
    pub text: Option<String>,
    pub strict: Option<bool>,
    /// Sort literal as selected; must be `asc` or `desc` if present.
    pub sort: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

// ===== Query =====

/// Validated search request.
///
/// `Query::default()` is the empty query (every field absent), which lists
/// everything in the store's default order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    text: Option<String>,
    strict: Option<bool>,
    sort: Option<SortOrder>,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
}

impl Query {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn strict(&self) -> Option<bool> {
        self.strict
    }

    /// Whether strict matching is requested (absent means lenient).
    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn date_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
    }

    /// Tag terms in the free text, in order, without blanks.
    pub fn tags(&self) -> Vec<&str> {
        self.text
            .as_deref()
            .map(tokens::tag_terms)
            .unwrap_or_default()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Query::default()
    }

    /// Whether `at` falls inside the (inclusive) date range.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.date_from.is_none_or(|from| at >= from) && self.date_to.is_none_or(|to| at <= to)
    }
}

// ===== Validation =====

/// Validate raw form input into a [`Query`].
///
/// # Errors
///
/// - [`ValidationError::BlankText`] when text is present but whitespace-only
/// - [`ValidationError::InvalidSort`] for any sort literal other than `asc`/`desc`
/// - [`ValidationError::InvalidTimestamp`] for a year outside 0000 to 9999
/// - [`ValidationError::InvertedDateRange`] when `date_to < date_from`
pub fn validate(raw: RawQuery) -> Result<Query, ValidationError> {
    let text = match raw.text {
        Some(text) if !text.is_empty() => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::BlankText);
            }
            Some(trimmed.to_string())
        }
        _ => None,
    };

    let sort = raw.sort.as_deref().map(str::parse).transpose()?;

    // Navigation timestamps carry milliseconds; anything finer would not survive a round trip.
    let date_from = raw
        .date_from
        .map(|at| four_digit_year(QueryField::DateFrom, at.trunc_subsecs(3)))
        .transpose()?;
    let date_to = raw
        .date_to
        .map(|at| four_digit_year(QueryField::DateTo, at.trunc_subsecs(3)))
        .transpose()?;

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if to < from {
            return Err(ValidationError::InvertedDateRange { from, to });
        }
    }

    Ok(Query {
        text,
        strict: raw.strict,
        sort,
        date_from,
        date_to,
    })
}

fn four_digit_year(
    field: QueryField,
    at: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    if (0..=9999).contains(&at.year()) {
        Ok(at)
    } else {
        Err(ValidationError::InvalidTimestamp {
            field,
            value: params::format_timestamp(at),
        })
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
