//! Search submission and address-bar navigation.
//!
//! Submitting from a single-post detail route pushes a new history entry on
//! the home feed; submitting anywhere else replaces the current route's
//! parameters in place. Back-navigation relies on that distinction.

use crate::model::{validate, Query, RawQuery, ValidationError};
use crate::parser::params::{self, SearchParams};
use tracing::{debug, warn};

/// Route searches from a detail view land on.
pub const HOME_ROUTE: &str = "/home";

/// Path segment identifying a single-post detail route.
pub const DETAIL_SEGMENT: &str = "/post/";

/// Route families that have no search box.
pub const SEARCHLESS_ROUTES: [&str; 2] = ["/albums", "/favorites"];

// ===== Navigation =====

/// How the history layer should apply a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// New history entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// A navigation to hand to the history layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub mode: NavigationMode,
    pub path: String,
    pub params: SearchParams,
}

impl Navigation {
    /// Path plus encoded parameters.
    pub fn href(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.params.to_query_string())
        }
    }
}

pub fn is_detail_route(path: &str) -> bool {
    path.contains(DETAIL_SEGMENT)
}

/// Whether the search box is shown on `path`.
pub fn search_available(path: &str) -> bool {
    !SEARCHLESS_ROUTES.iter().any(|route| path.contains(route))
}

/// Decide where a submitted `query` navigates from `current_path`.
pub fn plan_navigation(current_path: &str, query: &Query) -> Navigation {
    let params = params::serialize(query);
    if is_detail_route(current_path) {
        Navigation {
            mode: NavigationMode::Push,
            path: HOME_ROUTE.to_string(),
            params,
        }
    } else {
        Navigation {
            mode: NavigationMode::Replace,
            path: current_path.to_string(),
            params,
        }
    }
}

// ===== SearchForm =====

/// The search form's committed query and its inline error, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    committed: Query,
    error: Option<ValidationError>,
}

impl SearchForm {
    pub fn new(committed: Query) -> Self {
        Self {
            committed,
            error: None,
        }
    }

    /// Restore the form from address-bar parameters.
    ///
    /// # Errors
    ///
    /// Returns the parameter's [`ValidationError`] if the address is malformed.
    pub fn from_params(params: &SearchParams) -> Result<Self, ValidationError> {
        params::deserialize(params).map(Self::new)
    }

    pub fn committed(&self) -> &Query {
        &self.committed
    }

    /// Message to show next to the offending field.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Validate and commit `raw`, returning where to navigate.
    ///
    /// # Errors
    ///
    /// On a [`ValidationError`] the committed query is left untouched, so
    /// results already on screen stay there.
    pub fn submit(
        &mut self,
        raw: RawQuery,
        current_path: &str,
    ) -> Result<Navigation, ValidationError> {
        match validate(raw) {
            Ok(query) => {
                self.committed = query;
                self.error = None;
                let navigation = plan_navigation(current_path, &self.committed);
                debug!(mode = ?navigation.mode, href = %navigation.href(), "search submitted");
                Ok(navigation)
            }
            Err(err) => {
                warn!(field = %err.field(), error = %err, "search rejected");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}
