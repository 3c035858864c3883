// crates/friday-core/src/geo/mod.rs

//! # Geo resolution
//!
//! Where is the visitor? The answer is looked up once, cached for a day in
//! the durable store, and then read synchronously by every gating decision.
//!
//! This module holds the synchronous pieces (types, policy, cache). The
//! async owner that performs the lookup is [`service::GeoService`].

use crate::error::{FridayError, Result};
use crate::store::{read_json, write_json, CachedEntry, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "runtime")]
pub mod service;

pub const GEO_CACHE_KEY: &str = "friday_geo_location";
pub const DEFAULT_GEO_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// The visitor's country as far as the site knows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResolution {
    pub country: String,
    pub country_code: String,
    pub is_recognized_region: bool,
    /// Milliseconds since the Unix epoch.
    pub resolved_at: u64,
}

impl GeoResolution {
    /// Used when detection is inconclusive: the visitor is let through.
    pub fn fail_open(now_millis: u64) -> Self {
        Self {
            country: "United States".into(),
            country_code: "US".into(),
            is_recognized_region: true,
            resolved_at: now_millis,
        }
    }
}

/// What consumers observe. `Loading` means "suspend", never "deny".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GeoState {
    #[default]
    Loading,
    Resolved(GeoResolution),
}

impl GeoState {
    pub fn is_loading(&self) -> bool {
        matches!(self, GeoState::Loading)
    }

    pub fn resolution(&self) -> Option<&GeoResolution> {
        match self {
            GeoState::Loading => None,
            GeoState::Resolved(r) => Some(r),
        }
    }

    /// `None` while loading.
    pub fn is_recognized_region(&self) -> Option<bool> {
        self.resolution().map(|r| r.is_recognized_region)
    }

    pub fn country(&self) -> Option<&str> {
        self.resolution().map(|r| r.country.as_str())
    }

    pub fn country_code(&self) -> Option<&str> {
        self.resolution().map(|r| r.country_code.as_str())
    }
}

/// Which countries count as the launch region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeoPolicy {
    recognized: Vec<String>,
}

impl Default for GeoPolicy {
    fn default() -> Self {
        Self::new(["US"])
    }
}

impl GeoPolicy {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            recognized: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn recognizes(&self, country_code: &str) -> bool {
        let code = country_code.trim();
        self.recognized.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    pub fn resolve(&self, country: &str, country_code: &str, now_millis: u64) -> GeoResolution {
        GeoResolution {
            country: country.trim().to_owned(),
            country_code: country_code.trim().to_ascii_uppercase(),
            is_recognized_region: self.recognizes(country_code),
            resolved_at: now_millis,
        }
    }
}

/// Untrusted lookup payload: `{country | country_name, country_code}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeoPayload {
    #[serde(default, alias = "country_name")]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl GeoPayload {
    /// Accepts the payload only if both fields are present and non-empty.
    pub fn validate(self, policy: &GeoPolicy, now_millis: u64) -> Result<GeoResolution> {
        let country = self.country.filter(|s| !s.trim().is_empty());
        let code = self.country_code.filter(|s| !s.trim().is_empty());
        match (country, code) {
            (Some(country), Some(code)) => Ok(policy.resolve(&country, &code, now_millis)),
            (None, _) => Err(FridayError::MalformedPayload("missing country".into())),
            (_, None) => Err(FridayError::MalformedPayload("missing country_code".into())),
        }
    }
}

/// TTL-checked view of the geo entry in a [`KeyValueStore`].
pub struct GeoCache<'a> {
    store: &'a dyn KeyValueStore,
    ttl: Duration,
}

impl<'a> GeoCache<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self::with_ttl(store, DEFAULT_GEO_TTL)
    }

    pub fn with_ttl(store: &'a dyn KeyValueStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// The cached resolution if it is younger than the TTL.
    ///
    /// Recognition is re-evaluated against `policy`, so a policy change takes
    /// effect without waiting for the entry to expire. Read failures and
    /// stale entries both read as absent.
    pub fn load(&self, policy: &GeoPolicy, now_millis: u64) -> Option<GeoResolution> {
        let entry: CachedEntry<GeoResolution> = match read_json(self.store, GEO_CACHE_KEY) {
            Ok(Some(e)) => e,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "geo cache unreadable");
                return None;
            }
        };
        if !entry.is_fresh(now_millis, self.ttl.as_millis() as u64) {
            debug!(age_ms = now_millis.saturating_sub(entry.timestamp), "geo cache stale");
            return None;
        }
        let cached = entry.data;
        Some(GeoResolution {
            is_recognized_region: policy.recognizes(&cached.country_code),
            ..cached
        })
    }

    pub fn store(&self, resolution: &GeoResolution, now_millis: u64) -> Result<()> {
        write_json(
            self.store,
            GEO_CACHE_KEY,
            &CachedEntry::new(resolution, now_millis),
        )
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(GEO_CACHE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const HOUR: u64 = 60 * 60 * 1000;

    #[test]
    fn payload_needs_both_fields() {
        let policy = GeoPolicy::default();
        let ok = GeoPayload {
            country: Some("Canada".into()),
            country_code: Some("ca".into()),
        }
        .validate(&policy, 5)
        .unwrap();
        assert_eq!(ok.country_code, "CA");
        assert!(!ok.is_recognized_region);

        let missing = GeoPayload {
            country: Some("Canada".into()),
            country_code: Some(" ".into()),
        };
        assert!(matches!(
            missing.validate(&policy, 5),
            Err(FridayError::MalformedPayload(_))
        ));
    }

    #[test]
    fn payload_accepts_country_name_alias() {
        let p: GeoPayload =
            serde_json::from_str(r#"{"country_name":"United States","country_code":"US"}"#).unwrap();
        assert!(p.validate(&GeoPolicy::default(), 0).unwrap().is_recognized_region);
    }

    #[test]
    fn cache_round_trip_and_expiry() {
        let store = MemoryStore::new();
        let cache = GeoCache::new(&store);
        let policy = GeoPolicy::default();
        let res = policy.resolve("Canada", "CA", 1_000);

        cache.store(&res, 1_000).unwrap();
        assert_eq!(cache.load(&policy, 1_000 + 23 * HOUR), Some(res));
        assert_eq!(cache.load(&policy, 1_000 + 24 * HOUR), None);
    }

    #[test]
    fn cached_entry_uses_js_field_names() {
        let store = MemoryStore::new();
        let res = GeoPolicy::default().resolve("United States", "US", 42);
        GeoCache::new(&store).store(&res, 42).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&store.get(GEO_CACHE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["timestamp"], 42);
        assert_eq!(raw["data"]["countryCode"], "US");
        assert_eq!(raw["data"]["isRecognizedRegion"], true);
    }

    #[test]
    fn recognition_follows_current_policy() {
        let store = MemoryStore::new();
        let cache = GeoCache::new(&store);
        cache
            .store(&GeoPolicy::default().resolve("Canada", "CA", 0), 0)
            .unwrap();

        let widened = GeoPolicy::new(["US", "CA"]);
        assert!(cache.load(&widened, 10).unwrap().is_recognized_region);
    }

    #[test]
    fn loading_state_has_no_decision() {
        let s = GeoState::Loading;
        assert!(s.is_loading());
        assert_eq!(s.is_recognized_region(), None);
        let r = GeoState::Resolved(GeoResolution::fail_open(0));
        assert_eq!(r.is_recognized_region(), Some(true));
        assert_eq!(r.country_code(), Some("US"));
    }
}
