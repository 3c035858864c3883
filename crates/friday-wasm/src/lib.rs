//! friday-wasm — WebAssembly bindings for friday-core
//!
//! The page does its own `fetch` calls; this crate supplies the rules around
//! them so the browser and the native client agree on every decision.
//!
//! What it provides
//! ----------------
//! - `should_search(query, minChars)`: the typeahead's "is this worth a request" rule
//! - `gate_decision(isLoading, isRecognizedRegion)`: `"suspended" | "proceed" | "redirect"`
//! - Geo cache in `localStorage`:
//!   - `cached_geo(nowMs)` returns the fresh cached resolution or `null`
//!   - `accept_geo_payload(payload, nowMs)` validates an untrusted lookup
//!     payload, caches it, and falls back to the open default when malformed
//! - `set_recognized_countries(["US", "CA"])` widens the launch region (default `US`)
//! - Banner flag: `is_banner_dismissed()`, `dismiss_banner()`, `should_show_banner(nowMs)`
//! - Form checks returning the request body or a list of `{field, message}`:
//!   `validate_signup(form)`, `validate_feedback(form)`
//! - `exact_city_match(results, typed)`
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { cached_geo, accept_geo_payload, gate_decision } from 'friday-wasm';
//!
//! async function main() {
//!   await init();
//!   let geo = cached_geo(Date.now());
//!   if (!geo) {
//!     const payload = await fetch('https://ipapi.co/json/').then(r => r.json()).catch(() => null);
//!     geo = accept_geo_payload(payload, Date.now());
//!   }
//!   console.log(gate_decision(false, geo.isRecognizedRegion));
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Without `localStorage` (private mode, sandboxed frames) the cache and
//!   banner functions behave as if the store were empty and writes are dropped.
//! - Validation failures reject with an array of `{field, message}` objects.
use friday_core::banner;
use friday_core::geo::GeoPayload;
use friday_core::model::city::exact_match;
use friday_core::prelude::*;
use serde_wasm_bindgen::{from_value, to_value};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    // Launch region for every geo decision made by this module.
    static POLICY: RefCell<GeoPolicy> = RefCell::new(GeoPolicy::default());
}

fn policy() -> GeoPolicy {
    POLICY.with(|p| p.borrow().clone())
}

/* --------------------------------------------------------------------------
   localStorage
-------------------------------------------------------------------------- */

/// `window.localStorage` as a [`KeyValueStore`].
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// `None` when there is no window or storage access is denied.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

fn storage_err(e: JsValue) -> FridayError {
    FridayError::Storage(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_err)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_err)
    }
}

/// Falls back to a throwaway in-memory store so callers never branch.
fn with_store<R>(f: impl FnOnce(&dyn KeyValueStore) -> R) -> R {
    match LocalStorageStore::open() {
        Some(store) => f(&store),
        None => {
            log("localStorage unavailable, using memory");
            f(&MemoryStore::new())
        }
    }
}

fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());
    // Native test builds have no console to bind to.
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    log("friday-wasm ready");
}

/* --------------------------------------------------------------------------
   Search + gate
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn should_search(query: &str, min_chars: usize) -> bool {
    friday_core::text::is_searchable(query, min_chars)
}

#[wasm_bindgen]
pub fn gate_decision(is_loading: bool, is_recognized_region: bool) -> String {
    GateDecision::from_flags(is_loading, is_recognized_region)
        .as_str()
        .to_owned()
}

/// The result whose label or name equals what was typed, or `undefined`.
#[wasm_bindgen]
pub fn exact_city_match(results: JsValue, typed: &str) -> std::result::Result<JsValue, JsValue> {
    let results: Vec<CityResult> = from_value(results)?;
    match exact_match(&results, typed) {
        Some(hit) => Ok(to_value(hit)?),
        None => Ok(JsValue::UNDEFINED),
    }
}

/* --------------------------------------------------------------------------
   Geo cache + banner
-------------------------------------------------------------------------- */

/// Replaces the recognized ISO2 list (default `["US"]`). Cached
/// resolutions are re-evaluated against it on the next read.
#[wasm_bindgen]
pub fn set_recognized_countries(codes: Vec<String>) {
    let next = GeoPolicy::new(&codes);
    POLICY.with(|p| *p.borrow_mut() = next);
}

fn load_geo(store: &dyn KeyValueStore, now_ms: u64) -> Option<GeoResolution> {
    GeoCache::new(store).load(&policy(), now_ms)
}

/// Validates the payload, caching it when usable; otherwise fails open
/// without caching.
fn accept_payload(store: &dyn KeyValueStore, payload: Option<GeoPayload>, now_ms: u64) -> GeoResolution {
    let validated = payload
        .ok_or_else(|| FridayError::MalformedPayload("no payload".into()))
        .and_then(|p| p.validate(&policy(), now_ms));
    match validated {
        Ok(resolution) => {
            if let Err(e) = GeoCache::new(store).store(&resolution, now_ms) {
                log(&format!("could not cache geo resolution: {e}"));
            }
            resolution
        }
        Err(e) => {
            log(&format!("geo lookup unusable, allowing by default: {e}"));
            GeoResolution::fail_open(now_ms)
        }
    }
}

fn banner_visible(store: &dyn KeyValueStore, now_ms: u64) -> bool {
    let state = load_geo(store, now_ms)
        .map(GeoState::Resolved)
        .unwrap_or_default();
    banner::should_show(&state, store)
}

#[wasm_bindgen]
pub fn cached_geo(now_ms: f64) -> std::result::Result<JsValue, JsValue> {
    match with_store(|s| load_geo(s, now_ms as u64)) {
        Some(res) => Ok(to_value(&res)?),
        None => Ok(JsValue::NULL),
    }
}

/// `payload` is whatever the lookup endpoint returned (or `null` on a
/// network failure or timeout).
#[wasm_bindgen]
pub fn accept_geo_payload(payload: JsValue, now_ms: f64) -> std::result::Result<JsValue, JsValue> {
    let payload: Option<GeoPayload> = if payload.is_null() || payload.is_undefined() {
        None
    } else {
        from_value(payload).ok()
    };
    let res = with_store(|s| accept_payload(s, payload, now_ms as u64));
    Ok(to_value(&res)?)
}

#[wasm_bindgen]
pub fn is_banner_dismissed() -> bool {
    with_store(banner::is_dismissed)
}

#[wasm_bindgen]
pub fn dismiss_banner() -> std::result::Result<(), JsValue> {
    with_store(banner::dismiss).map_err(js_err)
}

#[wasm_bindgen]
pub fn should_show_banner(now_ms: f64) -> bool {
    with_store(|s| banner_visible(s, now_ms as u64))
}

/* --------------------------------------------------------------------------
   Forms
-------------------------------------------------------------------------- */

fn reject(err: FridayError) -> JsValue {
    match err {
        FridayError::Validation(fields) => to_value(&fields).unwrap_or_else(js_err),
        other => js_err(other),
    }
}

/// Returns the request body to POST, or rejects with the field errors.
#[wasm_bindgen]
pub fn validate_signup(form: JsValue) -> std::result::Result<JsValue, JsValue> {
    let form: SignupForm = from_value(form)?;
    let request = form.validate().map_err(reject)?;
    Ok(to_value(&request)?)
}

#[wasm_bindgen]
pub fn validate_feedback(form: JsValue) -> std::result::Result<JsValue, JsValue> {
    let form: FeedbackMessage = from_value(form)?;
    let message = form.validate().map_err(reject)?;
    Ok(to_value(&message)?)
}

#[wasm_bindgen]
pub fn feedback_categories() -> js_sys::Array {
    FeedbackCategory::ALL
        .iter()
        .map(|c| JsValue::from_str(c.as_str()))
        .collect()
}
