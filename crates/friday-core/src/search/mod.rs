// crates/friday-core/src/search/mod.rs

//! # City typeahead
//!
//! Keystrokes go through two gates before they become visible results:
//!
//! 1. [`debounce::Debouncer`] turns a burst of keystrokes into one call per
//!    pause in typing.
//! 2. [`tracker::RequestTracker`] keeps exactly one request current and
//!    refuses to apply anything else, whatever order responses arrive in.
//!
//! [`controller::SearchController`] wires both to a [`controller::SearchApi`]
//! and publishes a [`SearchState`].

use crate::model::CityResult;

#[cfg(feature = "runtime")]
pub mod controller;
#[cfg(feature = "runtime")]
pub mod debounce;
#[cfg(feature = "runtime")]
pub mod tracker;

pub const MIN_QUERY_CHARS: usize = 2;

/// What the typeahead shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Latest input value, updated on every keystroke.
    pub query: String,
    /// Results of the latest accepted request.
    pub results: Vec<CityResult>,
    /// True exactly while the current request is in flight.
    pub searching: bool,
    /// Transient failure of the latest request; cleared by the next one.
    pub error: Option<String>,
}

impl SearchState {
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.searching = false;
        self.error = None;
    }
}
