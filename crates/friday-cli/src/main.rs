//! friday-cli — Command-line driver for friday-core
//!
//! Runs the same flows the waitlist page runs, against the live endpoints
//! named in the config: the debounced city typeahead, the geo gate, the
//! waitlist signup and the contact form.
//!
//! Usage examples
//! --------------
//!
//! - Type "Seattle" one keystroke at a time and show what the dropdown ends on
//!   $ friday search Seattle
//!
//! - Resolve the visitor region (cached for 24h in the store file)
//!   $ friday --store ~/.friday/store.json geo
//!   $ friday --store ~/.friday/store.json geo --refresh
//!
//! - Join the waitlist with a listed city, or a free-text one
//!   $ friday signup --name "Ada" --email ada@example.com --city-id 42
//!   $ friday signup --name "Ada" --email ada@example.com --city "Tiny Town" --state WA
//!
//! - Contact form
//!   $ friday feedback --email ada@example.com --category bug "The map is blank"
//!
//! - Banner flag
//!   $ friday --store ~/.friday/store.json banner dismiss
mod args;

use crate::args::{BannerAction, CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use friday_core::banner;
use friday_core::model::city::exact_match;
use friday_core::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let store = open_store(&args, &config)?;
    let clients = HttpClients::from_config(&config).context("building HTTP client")?;

    match args.command {
        Commands::Search {
            query,
            keystroke_ms,
        } => {
            let controller = SearchController::from_config(Arc::new(clients.search), &config);
            let state = type_query(&controller, &query, Duration::from_millis(keystroke_ms), &config).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&state.results)?);
            } else if let Some(err) = &state.error {
                eprintln!("Search failed: {err}");
            } else if state.results.is_empty() {
                println!("No cities found matching: {}", state.query);
            } else {
                for city in &state.results {
                    println!("{:>8}  {}", city.id, city.label());
                }
                if let Some(hit) = exact_match(&state.results, &state.query) {
                    println!("Exact match: {} (id {})", hit.label(), hit.id);
                }
            }
        }

        Commands::Geo { refresh } => {
            if refresh {
                GeoCache::new(&*store).clear()?;
                info!("cleared cached geo resolution");
            }
            let geo = Arc::new(GeoService::from_config(Arc::new(clients.geo), store.clone(), &config));
            let resolution = geo.resolve().await;
            let state = geo.state();

            if args.json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("Country: {} ({})", resolution.country, resolution.country_code);
                println!("Recognized region: {}", resolution.is_recognized_region);
                println!("Gate: {}", GateDecision::from_state(&state).as_str());
                println!("Banner shown: {}", banner::should_show(&state, &*store));
            }
        }

        Commands::Signup {
            name,
            email,
            city_id,
            city,
            state,
        } => {
            let city = match (city_id, city) {
                (Some(city_id), _) => CitySelection::Listed { city_id, state },
                (None, Some(city)) => CitySelection::Other { city, state },
                (None, None) => anyhow::bail!("either --city-id or --city is required"),
            };
            let form = SignupForm { name, email, city };

            let geo = Arc::new(GeoService::from_config(Arc::new(clients.geo), store.clone(), &config));
            let mut ctx = geo.start();
            ctx.resolved().await?;

            let controller = SignupController::new(Arc::new(clients.signup), ctx);
            match controller.submit(&form).await? {
                SubmitOutcome::Registered { user, invitation } => {
                    println!("You're on the list, {}!", user.name);
                    if let Some(inv) = invitation {
                        if let Some(position) = inv.position {
                            println!("Position: #{position}");
                        }
                        if let Some(url) = inv.url.or(inv.code) {
                            println!("Invite friends: {url}");
                        }
                    }
                }
                SubmitOutcome::Fallback {
                    country,
                    country_code,
                } => {
                    println!("Friday hasn't launched in {country} ({country_code}) yet.");
                    println!("Use the feedback command to ask for your region.");
                }
                SubmitOutcome::Suspended => println!("Still detecting your region, try again."),
            }
        }

        Commands::Feedback {
            name,
            email,
            category,
            message,
        } => {
            let msg = FeedbackMessage {
                name,
                email,
                category,
                message,
            };
            FeedbackClient::new(Arc::new(clients.feedback))
                .send(&msg)
                .await?;
            println!("Thanks! Your {category} message was sent.");
        }

        Commands::Banner { action } => {
            match action {
                BannerAction::Dismiss => banner::dismiss(&*store)?,
                BannerAction::Reset => banner::reset(&*store)?,
                BannerAction::Status => {}
            }
            // Status only consults the cache; it never triggers a lookup.
            let policy = GeoPolicy::new(&config.recognized_countries);
            let state = GeoCache::with_ttl(&*store, config.geo_ttl())
                .load(&policy, SystemClock.now_millis())
                .map(GeoState::Resolved)
                .unwrap_or_default();
            println!("Dismissed: {}", banner::is_dismissed(&*store));
            println!("Would show: {}", banner::should_show(&state, &*store));
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "friday_core=debug,friday_cli=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> anyhow::Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => ClientConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let config = base.with_overrides(|key| std::env::var(key).ok())?;
    debug!(?config, "effective config");
    Ok(config)
}

fn open_store(args: &CliArgs, config: &ClientConfig) -> anyhow::Result<SharedStore> {
    match args.store.as_ref().or(config.store_path.as_ref()) {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("opening store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Feeds `query` into the controller prefix by prefix, then waits for the
/// debounced search to settle.
async fn type_query(
    controller: &SearchController,
    query: &str,
    keystroke: Duration,
    config: &ClientConfig,
) -> anyhow::Result<SearchState> {
    let mut rx = controller.subscribe();
    let mut typed = String::new();
    for ch in query.chars() {
        typed.push(ch);
        controller.on_input(&typed);
        tokio::time::sleep(keystroke).await;
    }

    tokio::time::sleep(config.debounce_window() + Duration::from_millis(20)).await;
    let settle = config.request_timeout() + Duration::from_secs(1);
    let state = tokio::time::timeout(settle, rx.wait_for(|s| !s.searching))
        .await
        .context("search did not settle")?
        .context("search controller stopped")?
        .clone();
    Ok(state)
}
