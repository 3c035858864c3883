//! City typeahead walkthrough
//!
//! This example demonstrates how to:
//! - Wire a `SearchApi` into a `SearchController`
//! - Watch the debounced state the dropdown renders from
//! - See a slow, superseded request lose to a later query
//!
//! Run with `RUST_LOG=friday_core=debug` to see the debouncer and tracker.

use async_trait::async_trait;
use friday_core::model::city::exact_match;
use friday_core::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// A small in-memory catalogue. Short prefixes answer slowly, like a cold index.
struct Catalogue {
    cities: Vec<CityResult>,
}

impl Catalogue {
    fn new() -> Self {
        let rows = [
            (1, "Seattle", "Washington", "WA"),
            (2, "SeaTac", "Washington", "WA"),
            (3, "Seaside", "Oregon", "OR"),
            (4, "San José", "California", "CA"),
            (5, "Santa Fe", "New Mexico", "NM"),
        ];
        let cities = rows
            .into_iter()
            .map(|(id, name, state, code)| CityResult {
                id,
                display: format!("{name}, {code}"),
                name: name.into(),
                state: state.into(),
                state_code: Some(code.into()),
                timezone: None,
            })
            .collect();
        Self { cities }
    }
}

#[async_trait]
impl SearchApi for Catalogue {
    async fn search(&self, term: &str) -> Result<Vec<CityResult>> {
        let latency = if term.chars().count() < 4 { 900 } else { 120 };
        sleep(Duration::from_millis(latency)).await;
        Ok(self
            .cities
            .iter()
            .filter(|c| c.label_contains(term))
            .cloned()
            .collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Friday typeahead example ===\n");

    let controller = SearchController::with_defaults(Arc::new(Catalogue::new()));
    let mut rx = controller.subscribe();

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let s = rx.borrow().clone();
            let labels: Vec<&str> = s.results.iter().map(|c| c.label()).collect();
            println!(
                "  [{:<10}] searching={:<5} results={:?}",
                s.query, s.searching, labels
            );
        }
    });

    // Example 1: a pause long enough to fire "Sea", then more typing.
    println!("--- Example 1: typing \"Sea\", pausing, then \"Seattle\" ---");
    for prefix in ["S", "Se", "Sea"] {
        controller.on_input(prefix);
        sleep(Duration::from_millis(120)).await;
    }
    // Past the debounce window: the slow "Sea" request is now in flight.
    sleep(Duration::from_millis(500)).await;
    for prefix in ["Seat", "Seatt", "Seattl", "Seattle"] {
        controller.on_input(prefix);
        sleep(Duration::from_millis(90)).await;
    }
    sleep(Duration::from_millis(1_500)).await;

    let state = controller.snapshot();
    if let Some(hit) = exact_match(&state.results, &state.query) {
        println!("✓ Exact match: {} (id {})\n", hit.label(), hit.id);
    }

    // Example 2: accents fold, so "san jose" finds "San José".
    println!("--- Example 2: accent-insensitive search ---");
    controller.on_input("san jose");
    sleep(Duration::from_millis(1_000)).await;
    println!();

    // Example 3: clearing below two characters drops results without a request.
    println!("--- Example 3: clearing the input ---");
    controller.on_input("s");
    sleep(Duration::from_millis(600)).await;
    assert!(controller.snapshot().results.is_empty());

    drop(controller);
    printer.await?;
    println!("\n✓ Done");
    Ok(())
}
