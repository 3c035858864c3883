// crates/friday-core/src/search/controller.rs
use super::debounce::Debouncer;
use super::tracker::RequestTracker;
use super::{SearchState, MIN_QUERY_CHARS};
use crate::config::ClientConfig;
use crate::error::{FridayError, Result};
use crate::model::CityResult;
use crate::text::is_searchable;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Remote city lookup: `GET <endpoint>?search=<term>`.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<CityResult>>;
}

/// Typeahead controller: feed it every keystroke, observe [`SearchState`].
pub struct SearchController {
    api: Arc<dyn SearchApi>,
    debouncer: Debouncer,
    tracker: Arc<RequestTracker>,
    state: Arc<watch::Sender<SearchState>>,
    min_chars: usize,
}

impl SearchController {
    pub fn new(api: Arc<dyn SearchApi>, window: Duration, min_chars: usize) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            api,
            debouncer: Debouncer::new(window),
            tracker: Arc::new(RequestTracker::new()),
            state: Arc::new(state),
            min_chars,
        }
    }

    pub fn from_config(api: Arc<dyn SearchApi>, config: &ClientConfig) -> Self {
        Self::new(api, config.debounce_window(), config.min_query_chars)
    }

    /// 400 ms window, 2 character minimum.
    pub fn with_defaults(api: Arc<dyn SearchApi>) -> Self {
        Self::new(api, Duration::from_millis(400), MIN_QUERY_CHARS)
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handles one change event of the input field.
    ///
    /// Every keystroke cancels the in-flight request, since its query no
    /// longer matches the input. Short input also clears the results and the
    /// pending timer. Anything else (re)starts the debounce window. Must be
    /// called from within a tokio runtime.
    pub fn on_input(&self, value: &str) {
        self.tracker.cancel_current();
        self.state.send_modify(|s| {
            s.query = value.to_owned();
            s.searching = false;
        });

        if !is_searchable(value, self.min_chars) {
            self.debouncer.cancel();
            self.state.send_modify(SearchState::clear_results);
            return;
        }

        let query = value.trim().to_owned();
        debug!(%query, "scheduling search");
        self.debouncer.schedule(run_search(
            self.api.clone(),
            self.tracker.clone(),
            self.state.clone(),
            query,
        ));
    }

    /// Closes the transient error message without touching the results.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Resets the field, e.g. after a city was picked.
    pub fn clear(&self) {
        self.on_input("");
    }

    pub fn is_searching(&self) -> bool {
        self.tracker.is_searching()
    }
}

async fn run_search(
    api: Arc<dyn SearchApi>,
    tracker: Arc<RequestTracker>,
    state: Arc<watch::Sender<SearchState>>,
    query: String,
) {
    let handle = tracker.issue(&query);
    state.send_modify(|s| {
        s.searching = true;
        s.error = None;
    });

    let outcome = tokio::select! {
        biased;
        _ = handle.cancelled() => {
            debug!(%query, "search cancelled");
            return;
        }
        r = api.search(&query) => r,
    };

    let applied = tracker.settle(&handle, || {
        state.send_modify(|s| {
            s.searching = false;
            match outcome {
                Ok(results) => {
                    debug!(%query, count = results.len(), "applying search results");
                    s.results = results;
                }
                Err(FridayError::Cancelled) => {}
                Err(e) => {
                    warn!(%query, error = %e, "city search failed");
                    s.error = Some(e.to_string());
                }
            }
        })
    });
    if applied.is_none() {
        debug!(%query, "response arrived after being superseded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Echo {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchApi for Echo {
        async fn search(&self, term: &str) -> Result<Vec<CityResult>> {
            self.calls.lock().unwrap().push(term.to_owned());
            if term == "fail" {
                return Err(FridayError::Timeout(Duration::from_secs(10)));
            }
            Ok(vec![CityResult {
                id: 1,
                display: format!("{term}, WA"),
                name: term.to_owned(),
                state: "Washington".into(),
                state_code: Some("WA".into()),
                timezone: None,
            }])
        }
    }

    fn controller() -> (SearchController, Arc<Echo>) {
        let api = Arc::new(Echo {
            calls: Mutex::new(Vec::new()),
        });
        (SearchController::with_defaults(api.clone()), api)
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_clears_without_a_request() {
        let (c, api) = controller();
        c.on_input("Seattle");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(c.snapshot().results.len(), 1);

        c.on_input("S");
        let s = c.snapshot();
        assert!(s.results.is_empty());
        assert!(!s.searching);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*api.calls.lock().unwrap(), vec!["Seattle"]);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_is_surfaced_and_cleared_by_next_search() {
        let (c, _api) = controller();
        c.on_input("fail");
        tokio::time::sleep(Duration::from_millis(500)).await;
        let s = c.snapshot();
        assert!(s.error.as_deref().unwrap().contains("timed out"));
        assert!(!s.searching);

        c.on_input("Tacoma");
        tokio::time::sleep(Duration::from_millis(500)).await;
        let s = c.snapshot();
        assert!(s.error.is_none());
        assert_eq!(s.results[0].display, "Tacoma, WA");
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_the_error_keeps_results() {
        let (c, _api) = controller();
        c.on_input("Tacoma");
        tokio::time::sleep(Duration::from_millis(500)).await;
        c.on_input("fail");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(c.snapshot().error.is_some());

        let mut rx = c.subscribe();
        c.dismiss_error();
        assert!(rx.has_changed().unwrap());
        let s = c.snapshot();
        assert!(s.error.is_none());
        assert_eq!(s.results[0].display, "Tacoma, WA");

        rx.borrow_and_update();
        c.dismiss_error();
        assert!(!rx.has_changed().unwrap(), "no-op dismiss does not notify");
    }
}
