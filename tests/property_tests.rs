//! Property-based tests for parser and paging invariants.
//!
//! Tests validate:
//! 1. The in-progress token is the last comma segment, trimmed
//! 2. Serialize/deserialize round-trips every valid query, and validation
//!    rejects exactly the timestamps that would not
//! 3. Paging a static store visits every matching post exactly once, in order

use boardsearch::model::{validate, Post, PostId, Query, RawQuery, ValidationError};
use boardsearch::parser::{deserialize, extract_in_progress_token, serialize, SearchParams};
use boardsearch::source::{MemoryPostStore, PageQuery, StoredPost};
use boardsearch::state::{FeedScope, PageCursor};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Property 1: Token Extraction =====

proptest! {
    #[test]
    fn token_is_last_segment_trimmed(segments in prop::collection::vec("[a-z ]{0,6}", 1..5)) {
        let raw = segments.join(",");
        let expected = segments.last().map(|s| s.trim()).unwrap_or_default();
        prop_assert_eq!(extract_in_progress_token(&raw), expected);
    }

    #[test]
    fn token_without_comma_is_whole_input(raw in "[a-z ]{0,12}") {
        prop_assert_eq!(extract_in_progress_token(&raw), raw.trim());
    }
}

// ===== Property 2: Serializer Round-Trip =====

/// Spans roughly years -300 to 11500, crossing both four-digit bounds.
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (-72_000_000_000_000i64..300_000_000_000_000)
        .prop_map(|ms| Utc.timestamp_millis_opt(ms).unwrap())
}

fn four_digit_year(at: Option<DateTime<Utc>>) -> bool {
    at.is_none_or(|at| (0..=9999).contains(&at.year()))
}

fn raw_query() -> impl Strategy<Value = RawQuery> {
    (
        prop::option::of(prop::collection::vec("[a-z][a-z0-9 ]{0,7}[a-z]", 1..4)),
        prop::option::of(any::<bool>()),
        prop::option::of(prop_oneof![Just("asc"), Just("desc")]),
        prop::option::of(timestamp()),
        prop::option::of(timestamp()),
    )
        .prop_map(|(tags, strict, sort, a, b)| {
            let (date_from, date_to) = match (a, b) {
                (Some(a), Some(b)) => (Some(a.min(b)), Some(a.max(b))),
                other => other,
            };
            RawQuery {
                text: tags.map(|t| t.join(", ")),
                strict,
                sort: sort.map(str::to_string),
                date_from,
                date_to,
            }
        })
}

fn valid_query() -> impl Strategy<Value = Query> {
    raw_query().prop_filter_map("year outside 0000..=9999", |raw| validate(raw).ok())
}

proptest! {
    #[test]
    fn validation_accepts_only_four_digit_years(raw in raw_query()) {
        let in_range = four_digit_year(raw.date_from) && four_digit_year(raw.date_to);
        match validate(raw) {
            Ok(query) => {
                prop_assert!(in_range);
                prop_assert_eq!(deserialize(&serialize(&query)).unwrap(), query);
            }
            Err(err) => {
                prop_assert!(!in_range);
                let is_timestamp_error = matches!(err, ValidationError::InvalidTimestamp { .. });
                prop_assert!(is_timestamp_error);
            }
        }
    }

    #[test]
    fn params_round_trip(query in valid_query()) {
        prop_assert_eq!(deserialize(&serialize(&query)).unwrap(), query);
    }

    #[test]
    fn query_string_round_trip(query in valid_query()) {
        let encoded = serialize(&query).to_query_string();
        let decoded = SearchParams::parse_query_string(&encoded);
        prop_assert_eq!(deserialize(&decoded).unwrap(), query);
    }

    #[test]
    fn absent_fields_are_omitted(query in valid_query()) {
        let params = serialize(&query);
        prop_assert_eq!(params.get("query").is_some(), query.text().is_some());
        prop_assert_eq!(params.get("sort").is_some(), query.sort().is_some());
        prop_assert_eq!(params.get("from").is_some(), query.date_from().is_some());
        prop_assert!(params.ordered().iter().all(|(_, v)| !v.is_empty()));
    }
}

// ===== Property 3: Cursor Monotonicity =====

fn catalogue(days: &[i64]) -> MemoryPostStore {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let records = days
        .iter()
        .enumerate()
        .map(|(n, day)| StoredPost {
            post: Post {
                id: PostId::new(format!("p{n:03}")).unwrap(),
                public_id: format!("x{n}"),
                source_url: String::new(),
                thumbnail_url: String::new(),
                owner_id: None,
            },
            tags: vec!["cat".to_string()],
            created_at: base + chrono::Duration::days(*day),
        })
        .collect();
    MemoryPostStore::new(records)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn paging_visits_each_post_once_in_order(
        days in prop::collection::vec(0i64..20, 0..60),
        page_size in 1usize..10,
    ) {
        let store = catalogue(&days);
        let mut cursor = PageCursor::new(FeedScope::default());
        let mut rounds = 0;

        while let Some(request) = cursor.begin_fetch() {
            let result = store.page(&PageQuery {
                scope: request.scope.clone(),
                cursor: request.cursor.clone(),
                limit: page_size,
            });
            cursor.complete_fetch(&request, result);
            rounds += 1;
            prop_assert!(rounds <= days.len() / page_size + 2, "paging must terminate");
        }

        let items = cursor.state().items();
        prop_assert_eq!(items.len(), days.len());

        let distinct: HashSet<&str> = items.iter().map(|p| p.key().as_str()).collect();
        prop_assert_eq!(distinct.len(), items.len());

        let expected: Vec<&str> = store
            .ordered(&FeedScope::default())
            .into_iter()
            .map(|r| r.post.key().as_str())
            .collect();
        let actual: Vec<&str> = items.iter().map(|p| p.key().as_str()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(!cursor.state().has_more());
    }
}
