//! Text parsing for the search box and the address bar.
//!
//! Pure functions only: tag tokens out of the free-text field, and the
//! query <-> navigation parameter mapping.

pub mod params;
pub mod tokens;

pub use params::{deserialize, serialize, SearchParams};
pub use tokens::{extract_in_progress_token, replace_in_progress_token};
