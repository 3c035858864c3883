//! Waitlist signup walkthrough
//!
//! This example demonstrates how to:
//! - Resolve the visitor region once and share it through a `GeoContext`
//! - Keep the submit button suspended while the lookup runs
//! - Route visitors outside the launch region to the fallback form
//! - Surface the backend's own rejection message
//!
//! Pass a country code to play a visitor from elsewhere:
//! `cargo run --example waitlist_flow -- DE`

use async_trait::async_trait;
use friday_core::banner;
use friday_core::model::{Invitation, SignupResponse, User};
use friday_core::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers after a short delay with a fixed country.
struct StaticGeo {
    country: String,
    country_code: String,
}

#[async_trait]
impl GeoLookup for StaticGeo {
    async fn lookup(&self) -> Result<GeoPayload> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(GeoPayload {
            country: Some(self.country.clone()),
            country_code: Some(self.country_code.clone()),
        })
    }
}

/// Rejects an email it has already seen, like the real endpoint.
#[derive(Default)]
struct InMemoryWaitlist {
    emails: Mutex<HashSet<String>>,
}

#[async_trait]
impl SignupApi for InMemoryWaitlist {
    async fn submit(&self, request: &SignupRequest) -> Result<SignupResponse> {
        let mut emails = self
            .emails
            .lock()
            .map_err(|_| FridayError::Storage("waitlist lock poisoned".into()))?;
        if !emails.insert(request.email.clone()) {
            return Ok(SignupResponse {
                success: false,
                user: None,
                invitation: None,
                message: Some("This email is already on the waitlist".into()),
            });
        }
        let position = emails.len() as u64;
        Ok(SignupResponse {
            success: true,
            user: Some(User {
                id: Some(position),
                name: request.name.clone(),
                email: request.email.clone(),
            }),
            invitation: Some(Invitation {
                code: Some(format!("FRI-{position:04}")),
                position: Some(position),
                url: None,
            }),
            message: None,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let code = std::env::args().nth(1).unwrap_or_else(|| "US".into());
    let country = match code.to_ascii_uppercase().as_str() {
        "US" => "United States",
        "DE" => "Germany",
        "CA" => "Canada",
        _ => "Elsewhere",
    };

    println!("=== Friday waitlist example ({code}) ===\n");

    let store: SharedStore = Arc::new(MemoryStore::new());
    let geo = Arc::new(GeoService::new(
        Arc::new(StaticGeo {
            country: country.into(),
            country_code: code.clone(),
        }),
        store.clone(),
    ));

    // Example 1: the form mounts while geo is still loading.
    println!("--- Example 1: before the lookup returns ---");
    let mut ctx = geo.start();
    let signup = SignupController::new(Arc::new(InMemoryWaitlist::default()), ctx.clone());
    let form = SignupForm {
        name: "Ada Lovelace".into(),
        email: "Ada@Example.com".into(),
        city: CitySelection::Listed {
            city_id: 1,
            state: Some("WA".into()),
        },
    };
    println!("Gate: {}", signup.decision().as_str());
    println!("Submit: {:?}\n", signup.submit(&form).await?);

    // Example 2: geo resolves; the same click now goes somewhere.
    println!("--- Example 2: after the lookup ---");
    let resolution = ctx.resolved().await?;
    println!(
        "Resolved: {} ({}), recognized={}",
        resolution.country, resolution.country_code, resolution.is_recognized_region
    );
    println!("Gate: {}", signup.decision().as_str());
    println!("Banner shown: {}", banner::should_show(&ctx.state(), &*store));

    match signup.submit(&form).await? {
        SubmitOutcome::Registered { user, invitation } => {
            let position = invitation.and_then(|i| i.position).unwrap_or_default();
            println!("✓ {} <{}> joined at #{position}\n", user.name, user.email);

            // Example 3: the backend message is shown as-is.
            println!("--- Example 3: signing up twice ---");
            match signup.submit(&form).await {
                Err(e) if e.kind() == ErrorKind::Upstream => println!("Rejected: {e}"),
                other => println!("Unexpected: {other:?}"),
            }
        }
        SubmitOutcome::Fallback { country, .. } => {
            println!("Not launched in {country} yet, showing the alternate form.");
            banner::dismiss(&*store)?;
            println!("Banner shown after dismiss: {}", banner::should_show(&ctx.state(), &*store));
        }
        SubmitOutcome::Suspended => println!("Still suspended"),
    }

    // Example 4: validation happens before anything is sent.
    println!("\n--- Example 4: invalid form ---");
    let bad = SignupForm {
        name: " ".into(),
        email: "nope".into(),
        city: CitySelection::Other {
            city: String::new(),
            state: None,
        },
    };
    if let Err(e) = signup.submit(&bad).await {
        for field in e.field_errors() {
            println!("  {field}");
        }
    }

    Ok(())
}
