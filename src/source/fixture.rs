//! JSONL fixture loading for the in-memory store.
//!
//! One [`StoredPost`] per line. Blank lines are ignored; lines that fail to
//! decode are logged and collected so one bad record does not sink the file.

use super::memory::StoredPost;
use crate::model::error::SourceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Records read from a fixture, plus the lines that were rejected.
#[derive(Debug, Default)]
pub struct FixtureLoad {
    pub records: Vec<StoredPost>,
    pub skipped: Vec<SourceError>,
}

/// Read every post record in `path`.
///
/// # Errors
///
/// Returns `SourceError::FileNotFound` if the file does not exist.
/// Returns `SourceError::Io` if reading fails part way.
pub fn load_posts(path: impl AsRef<Path>) -> Result<FixtureLoad, SourceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut load = FixtureLoad::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<StoredPost>(trimmed) {
            Ok(record) => load.records.push(record),
            Err(err) => {
                let skipped = SourceError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: err.to_string(),
                };
                warn!(error = %skipped, "fixture line skipped");
                load.skipped.push(skipped);
            }
        }
    }

    info!(
        path = %path.display(),
        records = load.records.len(),
        skipped = load.skipped.len(),
        "fixture loaded"
    );
    Ok(load)
}
