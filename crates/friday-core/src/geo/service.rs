// crates/friday-core/src/geo/service.rs
use super::{GeoCache, GeoPayload, GeoPolicy, GeoResolution, GeoState, DEFAULT_GEO_TTL};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::{FridayError, Result};
use crate::gate::{FormGate, GateDecision};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, OnceCell};
use tracing::{debug, info, warn};

pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(5);

/// Store shared between the geo service and anything else holding it.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// The remote "where am I" endpoint. Its payload is untrusted.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self) -> Result<GeoPayload>;
}

/// Single owner of the geo resolution.
///
/// The lookup happens at most once per service, however many consumers ask
/// for it, and every consumer observes the same result through a
/// [`GeoContext`].
pub struct GeoService {
    lookup: Arc<dyn GeoLookup>,
    store: SharedStore,
    clock: Arc<dyn Clock>,
    policy: GeoPolicy,
    timeout: Duration,
    ttl: Duration,
    state: watch::Sender<GeoState>,
    resolved: OnceCell<GeoResolution>,
}

impl GeoService {
    pub fn new(lookup: Arc<dyn GeoLookup>, store: SharedStore) -> Self {
        let (state, _) = watch::channel(GeoState::Loading);
        Self {
            lookup,
            store,
            clock: Arc::new(SystemClock),
            policy: GeoPolicy::default(),
            timeout: DEFAULT_GEO_TIMEOUT,
            ttl: DEFAULT_GEO_TTL,
            state,
            resolved: OnceCell::new(),
        }
    }

    pub fn from_config(lookup: Arc<dyn GeoLookup>, store: SharedStore, config: &ClientConfig) -> Self {
        Self::new(lookup, store)
            .with_policy(GeoPolicy::new(&config.recognized_countries))
            .with_timeout(config.geo_timeout())
            .with_ttl(config.geo_ttl())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: GeoPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// A read-only view for one consumer.
    pub fn context(&self) -> GeoContext {
        GeoContext {
            rx: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> GeoState {
        self.state.borrow().clone()
    }

    /// Kicks off resolution in the background ("on mount") and returns a
    /// context that starts out `Loading`.
    pub fn start(self: &Arc<Self>) -> GeoContext {
        let ctx = self.context();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.resolve().await;
        });
        ctx
    }

    /// Resolves once; later and concurrent callers share the first result.
    pub async fn resolve(&self) -> GeoResolution {
        self.resolved
            .get_or_init(|| self.resolve_once())
            .await
            .clone()
    }

    async fn resolve_once(&self) -> GeoResolution {
        let now = self.clock.now_millis();
        let cached = self.cache().load(&self.policy, now);
        if let Some(cached) = cached {
            info!(country_code = %cached.country_code, "geo resolved from cache");
            return self.publish(cached);
        }

        debug!(timeout = ?self.timeout, "looking up visitor region");
        let outcome = match tokio::time::timeout(self.timeout, self.lookup.lookup()).await {
            Ok(Ok(payload)) => payload.validate(&self.policy, self.clock.now_millis()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FridayError::Timeout(self.timeout)),
        };

        let resolution = match outcome {
            Ok(resolution) => {
                if let Err(e) = self.cache().store(&resolution, resolution.resolved_at) {
                    warn!(error = %e, "could not cache geo resolution");
                }
                info!(
                    country_code = %resolution.country_code,
                    recognized = resolution.is_recognized_region,
                    "geo resolved"
                );
                resolution
            }
            Err(e) => {
                warn!(error = %e, "geo lookup failed, allowing by default");
                GeoResolution::fail_open(self.clock.now_millis())
            }
        };
        self.publish(resolution)
    }

    fn cache(&self) -> GeoCache<'_> {
        GeoCache::with_ttl(self.store.as_ref(), self.ttl)
    }

    fn publish(&self, resolution: GeoResolution) -> GeoResolution {
        self.state
            .send_replace(GeoState::Resolved(resolution.clone()));
        resolution
    }
}

/// Read-only handle on the shared geo state. Cheap to clone.
#[derive(Clone, Debug)]
pub struct GeoContext {
    rx: watch::Receiver<GeoState>,
}

impl GeoContext {
    /// A context pinned to `state`, for consumers that are handed a known answer.
    pub fn fixed(state: GeoState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self { rx }
    }

    pub fn state(&self) -> GeoState {
        self.rx.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.rx.borrow().is_loading()
    }

    pub fn decision(&self) -> GateDecision {
        GateDecision::from_state(&self.rx.borrow())
    }

    pub fn gate(&self) -> FormGate {
        FormGate::new(&self.rx.borrow())
    }

    /// Waits until the state leaves `Loading`.
    ///
    /// Fails with [`FridayError::Cancelled`] if the service went away first.
    pub async fn resolved(&mut self) -> Result<GeoResolution> {
        let state = self
            .rx
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|_| FridayError::Cancelled)?;
        state
            .resolution()
            .cloned()
            .ok_or(FridayError::Cancelled)
    }
}
