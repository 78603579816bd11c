//! Tests for the async feed shell.

use super::*;
use crate::model::{validate, Cursor, Query, RawQuery};
use crate::state::{DetachedObserver, FeedStatus};
use crate::test_harness::{page, posts, unavailable, ScriptedStore};
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn ids(state: &PageState) -> Vec<String> {
    state
        .items()
        .iter()
        .map(|p| p.key().as_str().to_string())
        .collect()
}

fn text_scope(text: &str) -> FeedScope {
    FeedScope::new(
        validate(RawQuery {
            text: Some(text.to_string()),
            ..RawQuery::default()
        })
        .unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn pages_append_in_order_until_exhausted() {
    let store = ScriptedStore::new()
        .reply(ms(20), Ok(page(posts(1..=5), true)))
        .reply(ms(20), Ok(page(posts(6..=10), true)))
        .reply(ms(20), Ok(page(Vec::new(), false)));
    let feed = Feed::new(store, FeedScope::default(), 5);

    feed.load_next().await.unwrap();
    let outcome = feed.load_next().await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Appended {
            count: 5,
            has_more: true
        }
    );
    assert_eq!(ids(&feed.snapshot()), (1..=10).map(|n| format!("p{n}")).collect::<Vec<_>>());

    feed.load_next().await.unwrap();
    assert!(!feed.snapshot().has_more());

    assert_eq!(feed.load_next().await.unwrap(), LoadOutcome::Skipped);
    assert_eq!(feed.store().call_count(), 3, "exhausted feed makes no call");
}

#[tokio::test(start_paused = true)]
async fn each_request_carries_previous_last_key() {
    let store = ScriptedStore::new()
        .reply(ms(5), Ok(page(posts(1..=3), true)))
        .reply(ms(5), Ok(page(posts(4..=6), false)));
    let feed = Feed::new(store, FeedScope::default(), 3);

    feed.load_next().await.unwrap();
    feed.load_next().await.unwrap();

    let cursors: Vec<Cursor> = feed.store().calls().into_iter().map(|q| q.cursor).collect();
    assert_eq!(cursors, vec![Cursor::start(), Cursor::new("p3")]);
    assert!(feed.store().calls().iter().all(|q| q.limit == 3));
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_make_one_store_call() {
    let store = ScriptedStore::new().reply(ms(100), Ok(page(posts(1..=5), true)));
    let feed = Feed::new(store, FeedScope::default(), 5);

    let (first, second) = tokio::join!(feed.load_next(), feed.load_next());

    assert_eq!(feed.store().call_count(), 1);
    assert_eq!(second.unwrap(), LoadOutcome::Skipped);
    assert!(matches!(first.unwrap(), LoadOutcome::Appended { count: 5, .. }));
}

#[tokio::test(start_paused = true)]
async fn rapid_visibility_signals_coalesce() {
    let store = ScriptedStore::new()
        .reply(ms(10), Ok(page(posts(1..=3), true)))
        .reply(ms(100), Ok(page(posts(4..=6), true)));
    let feed = Feed::new(store, FeedScope::default(), 3);
    feed.load_next().await.unwrap();

    let mut trigger = VisibilityTrigger::new(DetachedObserver);
    feed.with_state(|state| trigger.sync(state.items()));
    let last = crate::test_harness::post(3).id;

    let (a, b) = tokio::join!(
        feed.on_visible(&trigger, &last),
        feed.on_visible(&trigger, &last)
    );

    assert_eq!(feed.store().call_count(), 2);
    assert!(matches!(a.unwrap(), LoadOutcome::Appended { .. }));
    assert_eq!(b.unwrap(), LoadOutcome::Skipped);
}

#[tokio::test(start_paused = true)]
async fn interior_element_signal_is_ignored() {
    let store = ScriptedStore::new().reply(ms(10), Ok(page(posts(1..=3), true)));
    let feed = Feed::new(store, FeedScope::default(), 3);
    feed.load_next().await.unwrap();

    let mut trigger = VisibilityTrigger::new(DetachedObserver);
    feed.with_state(|state| trigger.sync(state.items()));

    let interior = crate::test_harness::post(1).id;
    assert_eq!(
        feed.on_visible(&trigger, &interior).await.unwrap(),
        LoadOutcome::Skipped
    );
    assert_eq!(feed.store().call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_items_and_retry_resumes() {
    let store = ScriptedStore::new()
        .reply(ms(5), Ok(page(posts(1..=2), true)))
        .reply(ms(5), Err(unavailable()))
        .reply(ms(5), Ok(page(posts(3..=4), false)));
    let feed = Feed::new(store, FeedScope::default(), 2);

    feed.load_next().await.unwrap();
    let err = feed.load_next().await.unwrap_err();
    assert_eq!(err.cursor, Cursor::new("p2"));

    let state = feed.snapshot();
    assert_eq!(ids(&state), vec!["p1", "p2"]);
    assert!(matches!(state.status(), FeedStatus::Failed(_)));

    feed.retry().await.unwrap();
    let state = feed.snapshot();
    assert_eq!(state.error(), None);
    assert_eq!(ids(&state), vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(feed.store().calls()[2].cursor, Cursor::new("p2"));
}

#[tokio::test(start_paused = true)]
async fn change_scope_empties_page_before_fetching() {
    let store = ScriptedStore::new()
        .reply(ms(5), Ok(page(posts(1..=3), true)))
        .reply(ms(50), Ok(page(posts(7..=8), false)));
    let feed = Feed::new(store, FeedScope::default(), 3);
    feed.load_next().await.unwrap();

    let observe_mid_flight = async {
        tokio::time::sleep(ms(10)).await;
        feed.snapshot()
    };
    let (outcome, mid) = tokio::join!(feed.change_scope(text_scope("cat")), observe_mid_flight);

    assert!(mid.items().is_empty());
    assert!(mid.cursor().is_start());
    assert!(mid.has_more());
    assert!(mid.is_loading());

    assert!(matches!(outcome.unwrap(), LoadOutcome::Appended { count: 2, .. }));
    assert_eq!(ids(&feed.snapshot()), vec!["p7", "p8"]);
    assert_eq!(feed.scope(), text_scope("cat"));
    assert_eq!(feed.store().calls()[1].cursor, Cursor::start());
}

#[tokio::test(start_paused = true)]
async fn reply_for_superseded_scope_is_dropped() {
    let store = ScriptedStore::new()
        .reply(ms(100), Ok(page(posts(1..=3), true)))
        .reply(ms(10), Ok(page(posts(7..=7), false)));
    let feed = Feed::new(store, FeedScope::default(), 3);

    let change = async {
        tokio::time::sleep(ms(20)).await;
        feed.change_scope(FeedScope::owned_by("u1", Query::default()))
            .await
    };
    let (stale, fresh) = tokio::join!(feed.load_next(), change);

    assert_eq!(stale.unwrap(), LoadOutcome::Superseded);
    assert!(matches!(fresh.unwrap(), LoadOutcome::Appended { count: 1, .. }));
    assert_eq!(ids(&feed.snapshot()), vec!["p7"]);
    assert!(!feed.snapshot().has_more());
}
