//! boardsearch - Entry Point

use boardsearch::config;
use boardsearch::model::{validate, AppError, Query, RawQuery};
use boardsearch::runtime::{suggestion_pipeline, Feed, LoadOutcome};
use boardsearch::source::{load_posts, MemoryPostStore, MemoryTagIndex, StoredPost};
use boardsearch::state::{search_available, FeedScope, SearchForm, SuggestionPanel};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// boardsearch - image board search and feed engine
#[derive(Parser, Debug)]
#[command(name = "boardsearch")]
#[command(version)]
#[command(about = "Validate searches, page through feeds, and complete tags")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a search and print where submitting it navigates
    Params {
        #[command(flatten)]
        query: QueryArgs,

        /// Route the search is submitted from
        #[arg(long, default_value = "/home")]
        path: String,
    },

    /// Page through a fixture feed, printing posts as JSON lines
    Feed {
        /// JSONL file of post records
        #[arg(long)]
        posts: PathBuf,

        #[command(flatten)]
        query: QueryArgs,

        /// Only posts uploaded by this user
        #[arg(long)]
        owner: Option<String>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Posts per page
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,
    },

    /// Complete the tag being typed at the end of TEXT
    Suggest {
        /// JSONL file of post records
        #[arg(long)]
        posts: PathBuf,

        /// Debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Raw search box text, e.g. "cat, do"
        text: String,
    },
}

/// Search fields shared by `params` and `feed`.
#[derive(clap::Args, Debug, Default, Clone, PartialEq)]
pub struct QueryArgs {
    /// Comma-separated tags
    #[arg(long)]
    pub query: Option<String>,

    /// Require every tag to match exactly
    #[arg(long)]
    pub strict: bool,

    /// Result order: asc or desc
    #[arg(long)]
    pub sort: Option<String>,

    /// Earliest upload time (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Latest upload time (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
}

impl QueryArgs {
    fn raw(&self) -> RawQuery {
        RawQuery {
            text: self.query.clone(),
            strict: self.strict.then_some(true),
            sort: self.sort.clone(),
            date_from: self.from,
            date_to: self.to,
        }
    }
}

impl Command {
    /// `(page_size, debounce_ms)` flags that override configuration.
    fn overrides(&self) -> (Option<usize>, Option<u64>) {
        match self {
            Command::Feed { page_size, .. } => (page_size.map(|n| n as usize), None),
            Command::Suggest { debounce_ms, .. } => (None, *debounce_ms),
            Command::Params { .. } => (None, None),
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<StoredPost>, AppError> {
    let load = load_posts(path)?;
    if !load.skipped.is_empty() {
        eprintln!("skipped {} malformed record(s) in {}", load.skipped.len(), path.display());
    }
    Ok(load.records)
}

fn run_params(query: &QueryArgs, path: &str) -> Result<(), AppError> {
    if !search_available(path) {
        warn!(path, "search submitted on a route without a search box");
        eprintln!("note: {path} has no search box");
    }

    let mut form = SearchForm::default();
    let navigation = form.submit(query.raw(), path)?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{:?} {}", navigation.mode, navigation.href())?;
    Ok(())
}

async fn run_feed(
    posts: &Path,
    query: Query,
    owner: Option<String>,
    pages: u32,
    page_size: usize,
) -> Result<(), AppError> {
    let store = MemoryPostStore::new(load_records(posts)?);
    let scope = match owner {
        Some(owner) => FeedScope::owned_by(owner, query),
        None => FeedScope::new(query),
    };
    let feed = Feed::new(store, scope, page_size);

    for _ in 0..pages {
        if feed.load_next().await? == LoadOutcome::Skipped {
            break;
        }
    }

    let state = feed.snapshot();
    let mut out = std::io::stdout().lock();
    for post in state.items() {
        let line = serde_json::to_string(post).map_err(std::io::Error::from)?;
        writeln!(out, "{line}")?;
    }

    if state.has_more() {
        eprintln!("{} post(s), more after {}", state.items().len(), state.cursor());
    } else {
        eprintln!("{} post(s), end of feed", state.items().len());
    }
    Ok(())
}

async fn run_suggest(
    posts: &Path,
    text: String,
    settings: &config::ResolvedConfig,
) -> Result<(), AppError> {
    let records = load_records(posts)?;
    let index = MemoryTagIndex::from_records(&records, settings.suggestion_limit);

    let (handle, worker) = suggestion_pipeline(index, settings.suggestion_settings());
    handle.input(text);
    drop(handle);
    let machine = worker.run().await;

    let mut out = std::io::stdout().lock();
    match machine.panel() {
        SuggestionPanel::Candidates(candidates) => {
            for candidate in candidates {
                writeln!(out, "{candidate}")?;
            }
        }
        SuggestionPanel::Hint | SuggestionPanel::Spinner => {
            eprintln!("no suggestions (separate each tag with a comma)");
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let (page_size_override, debounce_override) = args.command.overrides();
    let config = config::resolve(args.config.clone(), page_size_override, debounce_override)?;

    boardsearch::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    match args.command {
        Command::Params { query, path } => run_params(&query, &path),
        Command::Feed {
            posts,
            query,
            owner,
            pages,
            ..
        } => {
            let query = validate(query.raw())?;
            run_feed(&posts, query, owner, pages, config.page_size).await
        }
        Command::Suggest { posts, text, .. } => run_suggest(&posts, text, &config).await,
    }
}
