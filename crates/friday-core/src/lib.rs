// crates/friday-core/src/lib.rs

//! # friday-core
//!
//! Client core of the Friday waitlist site.
//!
//! The synchronous half (models, validation, the key-value store, the geo
//! cache and the region gate) always compiles, including on `wasm32`. The
//! async half (debouncer, request tracker, search controller, geo service and
//! HTTP clients) sits behind the default `runtime` feature.

pub mod banner;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod geo; // Cache + state; the async service lives in geo::service
pub mod model;
pub mod search; // Query rules; debounce/tracker/controller are runtime-only
pub mod store;
pub mod text;

#[cfg(feature = "runtime")]
pub mod feedback;
#[cfg(feature = "runtime")]
pub mod http;
#[cfg(feature = "runtime")]
pub mod signup;

pub mod prelude;

// Re-exports
pub use crate::clock::{Clock, SystemClock};
pub use crate::config::ClientConfig;
pub use crate::error::{ErrorKind, FieldError, FridayError, Result};
pub use crate::gate::{FormGate, GateDecision, GateOutcome};
pub use crate::geo::{GeoCache, GeoPolicy, GeoResolution, GeoState};
pub use crate::search::SearchState;
pub use crate::model::{
    CityResult, CitySelection, FeedbackCategory, FeedbackMessage, SignupForm, SignupRequest,
};
pub use crate::store::{FileStore, KeyValueStore, MemoryStore};

#[cfg(feature = "runtime")]
pub use crate::geo::service::{GeoContext, GeoLookup, GeoService};
#[cfg(feature = "runtime")]
pub use crate::search::controller::{SearchApi, SearchController};
#[cfg(feature = "runtime")]
pub use crate::signup::{SignupApi, SignupController, SubmitOutcome};
