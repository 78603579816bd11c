//! Tag suggestion state machine (pure).
//!
//! Phases: `Idle -> Debouncing -> Fetching -> Idle`. Time is passed in by the
//! caller so every transition is testable without a runtime; the async worker
//! in [`crate::runtime::suggestions`] supplies the clock and the network.
//!
//! Out-of-order replies are handled with a generation counter: each fetch
//! carries the generation it was issued under, and a reply is applied only if
//! that generation is still current when it arrives.

use crate::model::{Generation, SuggestionFetchError, TagOption};
use crate::parser::tokens;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Quiet period after the last keystroke before suggestions are fetched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest in-progress token that is worth completing.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

// ===== Settings =====

/// Tunables for the suggestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    pub debounce: Duration,
    pub min_token_len: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

// ===== SuggestionState =====

/// Suggestions currently on offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    token_queried: String,
    candidates: Vec<String>,
    generation: Generation,
}

impl SuggestionState {
    /// Token of the most recent fetch.
    pub fn token_queried(&self) -> &str {
        &self.token_queried
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Latest issued generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

// ===== Phase / Outcomes =====

/// Where the machine is between keystrokes and replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    Idle,
    /// Waiting for input to go quiet until `deadline`.
    Debouncing { deadline: Instant },
    /// A fetch for the current generation is in flight.
    Fetching,
}

/// A fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub generation: Generation,
    pub token: String,
}

/// What happened to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    /// A newer request was issued (or suggestions were cleared) meanwhile.
    StaleDiscarded,
    /// The fetch failed; candidates were cleared.
    Failed,
}

/// What the dropdown under the search box should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPanel<'a> {
    /// A fetch is in flight.
    Spinner,
    /// Nothing to offer: show the "separate tags with a comma" hint.
    Hint,
    Candidates(&'a [String]),
}

// ===== SuggestionMachine =====

/// Debounced, generation-guarded tag suggestion state.
#[derive(Debug, Clone)]
pub struct SuggestionMachine {
    settings: SuggestionSettings,
    phase: SuggestionPhase,
    state: SuggestionState,
    text: String,
    /// A fetch for the current generation has not replied yet.
    outstanding: bool,
}

impl SuggestionMachine {
    pub fn new(settings: SuggestionSettings) -> Self {
        Self {
            settings,
            phase: SuggestionPhase::Idle,
            state: SuggestionState::default(),
            text: String::new(),
            outstanding: false,
        }
    }

    pub fn settings(&self) -> SuggestionSettings {
        self.settings
    }

    pub fn phase(&self) -> SuggestionPhase {
        self.phase
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// Raw contents of the search box as last seen.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn candidates(&self) -> &[String] {
        self.state.candidates()
    }

    /// A fetch for the current generation is outstanding, even if a newer
    /// keystroke has reopened the debounce window.
    pub fn is_pending(&self) -> bool {
        self.outstanding
    }

    /// When the debounce window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            SuggestionPhase::Debouncing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Record a keystroke. Restarts the debounce window.
    pub fn on_input(&mut self, raw: impl Into<String>, now: Instant) {
        self.text = raw.into();
        self.phase = SuggestionPhase::Debouncing {
            deadline: now + self.settings.debounce,
        };
    }

    /// Close the debounce window if it has elapsed.
    ///
    /// Returns the fetch to perform, or `None` when the window is still open,
    /// no window is open, or the in-progress token is empty or too short (in
    /// which case suggestions are cleared).
    pub fn on_deadline(&mut self, now: Instant) -> Option<SuggestionRequest> {
        let SuggestionPhase::Debouncing { deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }

        let token = tokens::extract_in_progress_token(&self.text);
        if token.is_empty() || tokens::token_len(token) < self.settings.min_token_len {
            debug!(token, "in-progress token below threshold, clearing suggestions");
            self.clear();
            return None;
        }

        let generation = self.state.generation.next();
        self.state.generation = generation;
        self.state.token_queried = token.to_string();
        self.phase = SuggestionPhase::Fetching;
        self.outstanding = true;
        debug!(%generation, token, "suggestion fetch issued");

        Some(SuggestionRequest {
            generation,
            token: token.to_string(),
        })
    }

    /// Apply or discard a reply for the request issued under `generation`.
    pub fn on_response(
        &mut self,
        generation: Generation,
        result: Result<Vec<TagOption>, SuggestionFetchError>,
    ) -> ResponseOutcome {
        if generation != self.state.generation {
            debug!(%generation, current = %self.state.generation, "stale suggestions discarded");
            return ResponseOutcome::StaleDiscarded;
        }

        self.outstanding = false;
        // A keystroke may already have reopened the debounce window.
        if self.phase == SuggestionPhase::Fetching {
            self.phase = SuggestionPhase::Idle;
        }

        match result {
            Ok(options) => {
                self.state.candidates = options.into_iter().map(|option| option.value).collect();
                debug!(%generation, count = self.state.candidates.len(), "suggestions applied");
                ResponseOutcome::Applied
            }
            Err(err) => {
                debug!(%generation, error = %err, "suggestion fetch failed");
                self.state.candidates.clear();
                ResponseOutcome::Failed
            }
        }
    }

    /// Accept a suggestion: splice it over the in-progress token and clear.
    ///
    /// Returns the rewritten search box contents.
    pub fn accept(&mut self, suggestion: &str) -> &str {
        self.text = tokens::replace_in_progress_token(&self.text, suggestion);
        self.clear();
        &self.text
    }

    /// Drop all suggestions and invalidate any fetch still in flight.
    pub fn clear(&mut self) {
        self.state.candidates.clear();
        self.state.token_queried.clear();
        self.state.generation = self.state.generation.next();
        self.phase = SuggestionPhase::Idle;
        self.outstanding = false;
    }

    pub fn panel(&self) -> SuggestionPanel<'_> {
        if self.is_pending() {
            SuggestionPanel::Spinner
        } else if self.state.candidates.is_empty() {
            SuggestionPanel::Hint
        } else {
            SuggestionPanel::Candidates(&self.state.candidates)
        }
    }
}

impl Default for SuggestionMachine {
    fn default() -> Self {
        Self::new(SuggestionSettings::default())
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "suggestion_tests.rs"]
mod tests;
