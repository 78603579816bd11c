//! Query <-> navigation parameter mapping.
//!
//! Parameters live only in the address/history layer. Absent query fields are
//! omitted rather than encoded as empty strings, so that
//! `deserialize(&serialize(q)) == Ok(q)` for every validated `q`.

use crate::model::{validate, Query, QueryField, RawQuery, ValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Flat string-keyed parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(BTreeMap<String, String>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries with the known search keys first (in canonical order), then
    /// any other keys alphabetically.
    pub fn ordered(&self) -> Vec<(&str, &str)> {
        let known = QueryField::ALL
            .into_iter()
            .filter_map(|field| {
                let key = field.param_name();
                self.get(key).map(|value| (key, value))
            });
        let unknown = self
            .0
            .iter()
            .filter(|(key, _)| !is_search_key(key))
            .map(|(key, value)| (key.as_str(), value.as_str()));
        known.chain(unknown).collect()
    }

    /// Percent-encoded `key=value&...` form, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.ordered()
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string (optionally starting with `?`).
    ///
    /// `+` decodes to a space. Invalid UTF-8 escapes are replaced rather than
    /// rejected; later duplicates win.
    pub fn parse_query_string(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        raw.split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn is_search_key(key: &str) -> bool {
    QueryField::ALL
        .into_iter()
        .any(|field| field.param_name() == key)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Render a timestamp as fixed-width UTC ISO-8601 with milliseconds.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(field: QueryField, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

fn parse_flag(field: QueryField, raw: &str) -> Result<bool, ValidationError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ValidationError::InvalidFlag {
            field,
            value: other.to_string(),
        }),
    }
}

/// Map a validated query to navigation parameters.
pub fn serialize(query: &Query) -> SearchParams {
    let mut params = SearchParams::new();
    if let Some(text) = query.text() {
        params.insert(QueryField::Text.param_name(), text);
    }
    if let Some(strict) = query.strict() {
        params.insert(QueryField::Strict.param_name(), strict.to_string());
    }
    if let Some(sort) = query.sort() {
        params.insert(QueryField::Sort.param_name(), sort.as_param());
    }
    if let Some(from) = query.date_from() {
        params.insert(QueryField::DateFrom.param_name(), format_timestamp(from));
    }
    if let Some(to) = query.date_to() {
        params.insert(QueryField::DateTo.param_name(), format_timestamp(to));
    }
    params
}

/// Rebuild a query from navigation parameters.
///
/// Unknown keys are ignored. The result goes through [`validate`], so a
/// hand-edited address cannot produce a query the form could not.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, identifying the parameter.
pub fn deserialize(params: &SearchParams) -> Result<Query, ValidationError> {
    let strict = params
        .get(QueryField::Strict.param_name())
        .map(|raw| parse_flag(QueryField::Strict, raw))
        .transpose()?;
    let date_from = params
        .get(QueryField::DateFrom.param_name())
        .map(|raw| parse_timestamp(QueryField::DateFrom, raw))
        .transpose()?;
    let date_to = params
        .get(QueryField::DateTo.param_name())
        .map(|raw| parse_timestamp(QueryField::DateTo, raw))
        .transpose()?;

    validate(RawQuery {
        text: params.get(QueryField::Text.param_name()).map(str::to_string),
        strict,
        sort: params.get(QueryField::Sort.param_name()).map(str::to_string),
        date_from,
        date_to,
    })
}
