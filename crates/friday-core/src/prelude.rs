// crates/friday-core/src/prelude.rs
pub use crate::banner;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::ClientConfig;
pub use crate::error::{ErrorKind, FieldError, FridayError, Result};
pub use crate::gate::{FormGate, GateDecision, GateOutcome};
pub use crate::geo::{GeoCache, GeoPayload, GeoPolicy, GeoResolution, GeoState};
pub use crate::model::{
    CityResult, CitySelection, FeedbackCategory, FeedbackMessage, SignupForm, SignupRequest,
};
pub use crate::search::SearchState;
pub use crate::store::{FileStore, KeyValueStore, MemoryStore};

#[cfg(feature = "runtime")]
pub use crate::feedback::{FeedbackApi, FeedbackClient};
#[cfg(feature = "runtime")]
pub use crate::geo::service::{GeoContext, GeoLookup, GeoService, SharedStore};
#[cfg(feature = "runtime")]
pub use crate::http::HttpClients;
#[cfg(feature = "runtime")]
pub use crate::search::controller::{SearchApi, SearchController};
#[cfg(feature = "runtime")]
pub use crate::signup::{SignupApi, SignupController, SubmitOutcome};
