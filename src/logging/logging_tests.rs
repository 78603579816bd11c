//! Tests for subscriber setup and the events the engine emits.

use super::*;
use serial_test::serial;
use std::fs;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory writer so a scoped subscriber's output can be inspected.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(filter: &str, f: impl FnOnce()) -> String {
    let out = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(out.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    out.text()
}

#[test]
fn file_target_splits_directory_and_name() {
    let (dir, name) = file_target(Path::new("/var/log/boardsearch/app.log")).unwrap();
    assert_eq!(dir, Path::new("/var/log/boardsearch"));
    assert_eq!(name, "app.log");
}

#[test]
fn file_target_rejects_path_without_file_name() {
    assert!(matches!(
        file_target(Path::new("/")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
#[serial(tracing_init)]
fn init_creates_log_directory_if_missing() {
    let test_dir = std::env::temp_dir()
        .join(format!("boardsearch_test_logs_create_{}", std::process::id()));
    let _ = fs::remove_dir_all(&test_dir);

    // May report SubscriberAlreadySet; the directory is created first either way.
    let _ = init(&test_dir.join("test.log"));

    assert!(test_dir.exists(), "Log directory should be created: {:?}", test_dir);
    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
fn page_loads_are_logged_at_info() {
    use crate::model::PostPage;
    use crate::state::{FeedScope, PageCursor};

    let output = capture("info", || {
        let mut cursor = PageCursor::new(FeedScope::default());
        if let Some(request) = cursor.begin_fetch() {
            cursor.complete_fetch(&request, Ok(PostPage::exhausted()));
        }
    });

    assert!(output.contains("page loaded"), "got: {output}");
    assert!(output.contains("has_more=false"), "got: {output}");
    assert!(!output.contains("page fetch started"), "debug is filtered out");
}

#[test]
fn suggestion_failures_stay_below_info() {
    use crate::model::{Generation, StoreError, SuggestionFetchError};
    use crate::state::SuggestionMachine;

    let output = capture("info", || {
        let mut machine = SuggestionMachine::default();
        machine.on_response(
            Generation::default(),
            Err(SuggestionFetchError {
                token: "cat".to_string(),
                source: StoreError::Unavailable {
                    reason: "down".to_string(),
                },
            }),
        );
    });

    assert!(output.is_empty(), "got: {output}");
}
