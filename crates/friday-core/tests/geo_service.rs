// crates/friday-core/tests/geo_service.rs
mod common;

use common::{FakeGeo, GeoReply};
use friday_core::geo::GEO_CACHE_KEY;
use friday_core::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const HOUR_MS: u64 = 60 * 60 * 1000;
const NOW: u64 = 1_700_000_000_000;

fn service(reply: GeoReply, store: Arc<MemoryStore>) -> (Arc<GeoService>, Arc<FakeGeo>) {
    let lookup = Arc::new(FakeGeo::new(reply));
    let svc = GeoService::new(lookup.clone(), store).with_clock(Arc::new(ManualClock::new(NOW)));
    (Arc::new(svc), lookup)
}

fn seed_cache(store: &MemoryStore, code: &str, written_at: u64) {
    let res = GeoPolicy::default().resolve("Somewhere", code, written_at);
    GeoCache::new(store).store(&res, written_at).unwrap();
}

#[tokio::test(start_paused = true)]
async fn fresh_cache_skips_the_lookup() {
    let store = Arc::new(MemoryStore::new());
    seed_cache(&store, "US", NOW - 2 * HOUR_MS);
    let (svc, lookup) = service(GeoReply::Country("Canada", "CA"), store);

    let res = svc.resolve().await;
    assert_eq!(res.country_code, "US");
    assert!(res.is_recognized_region);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn stale_cache_triggers_fresh_lookup_and_rewrite() {
    let store = Arc::new(MemoryStore::new());
    seed_cache(&store, "US", NOW - 25 * HOUR_MS);
    let (svc, lookup) = service(GeoReply::Country("Canada", "CA"), store.clone());

    let res = svc.resolve().await;
    assert_eq!(lookup.calls(), 1);
    assert_eq!(res.country_code, "CA");
    assert!(!res.is_recognized_region);

    let rewritten = GeoCache::new(&*store)
        .load(&GeoPolicy::default(), NOW)
        .unwrap();
    assert_eq!(rewritten.country, "Canada");
    assert_eq!(rewritten.resolved_at, NOW);
}

#[tokio::test(start_paused = true)]
async fn timeout_fails_open() {
    let store = Arc::new(MemoryStore::new());
    let (svc, _) = service(GeoReply::Hang, store.clone());
    let mut ctx = svc.start();
    assert!(ctx.is_loading());
    assert_eq!(ctx.decision(), GateDecision::Suspended);

    let res = ctx.resolved().await.unwrap();
    assert!(res.is_recognized_region);
    assert!(!ctx.is_loading());
    assert_eq!(ctx.decision(), GateDecision::Proceed);
    assert_eq!(ctx.gate().decision(), GateDecision::Proceed);
    // The default is not cached; the next visit tries again.
    assert!(store.get(GEO_CACHE_KEY).unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn timeout_is_bounded_by_configured_window() {
    let store = Arc::new(MemoryStore::new());
    let lookup = Arc::new(FakeGeo::new(GeoReply::Hang));
    let svc = GeoService::new(lookup, store).with_timeout(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    svc.resolve().await;
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(5));
    assert!(waited < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn errors_and_malformed_payloads_fail_open() {
    for reply in [GeoReply::Fail, GeoReply::Malformed] {
        let store = Arc::new(MemoryStore::new());
        let (svc, lookup) = service(reply, store.clone());
        let res = svc.resolve().await;
        assert_eq!(lookup.calls(), 1);
        assert!(res.is_recognized_region);
        assert!(!svc.state().is_loading());
        assert!(store.is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_consumers_share_one_lookup() {
    let store = Arc::new(MemoryStore::new());
    let (svc, lookup) = service(GeoReply::Country("France", "FR"), store);

    let mut a = svc.context();
    let mut b = svc.context();
    let _ = svc.start();
    let (ra, rb, rc) = tokio::join!(a.resolved(), b.resolved(), svc.resolve());

    assert_eq!(lookup.calls(), 1);
    assert_eq!(ra.unwrap(), rc);
    assert_eq!(rb.unwrap(), rc);
    assert_eq!(rc.country_code, "FR");
    assert_eq!(svc.resolve().await, rc);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn fixed_context_reports_its_value_or_cancellation() {
    let mut ctx = GeoContext::fixed(GeoState::Resolved(GeoResolution::fail_open(0)));
    assert_eq!(ctx.resolved().await.unwrap().country_code, "US");

    let mut pending = GeoContext::fixed(GeoState::Loading);
    assert!(matches!(pending.resolved().await, Err(FridayError::Cancelled)));
}
