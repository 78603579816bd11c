//! boardsearch
//!
//! Incremental tag search and cursor-paginated feeds for an image board.
//!
//! Pure Core / Impure Shell: `model`, `parser` and `state` hold every rule
//! as plain data and transitions; `runtime` drives them against the async
//! collaborators in `source`.

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod runtime;
pub mod source;
pub mod state;

#[cfg(test)]
mod test_harness;
