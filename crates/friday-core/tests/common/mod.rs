// crates/friday-core/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use friday_core::geo::GeoPayload;
use friday_core::model::{CityResult, SignupRequest, SignupResponse, User};
use friday_core::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn city(id: u64, display: &str) -> CityResult {
    CityResult {
        id,
        display: display.into(),
        name: display.split(',').next().unwrap_or(display).trim().into(),
        state: "Washington".into(),
        state_code: Some("WA".into()),
        timezone: Some("America/Los_Angeles".into()),
    }
}

/// Search API with a per-query latency and canned results.
#[derive(Default)]
pub struct ScriptedSearch {
    script: HashMap<String, (Duration, Vec<CityResult>)>,
    pub issued: Mutex<Vec<String>>,
    pub completed: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    pub fn on(mut self, term: &str, latency_ms: u64, results: Vec<CityResult>) -> Self {
        self.script
            .insert(term.into(), (Duration::from_millis(latency_ms), results));
        self
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchApi for ScriptedSearch {
    async fn search(&self, term: &str) -> Result<Vec<CityResult>> {
        self.issued.lock().unwrap().push(term.to_owned());
        let (latency, results) = self
            .script
            .get(term)
            .cloned()
            .unwrap_or((Duration::from_millis(10), Vec::new()));
        tokio::time::sleep(latency).await;
        self.completed.lock().unwrap().push(term.to_owned());
        Ok(results)
    }
}

pub enum GeoReply {
    Country(&'static str, &'static str),
    Fail,
    Malformed,
    Hang,
}

/// Geo endpoint double that counts calls.
pub struct FakeGeo {
    reply: GeoReply,
    latency: Duration,
    calls: AtomicUsize,
}

impl FakeGeo {
    pub fn new(reply: GeoReply) -> Self {
        Self {
            reply,
            latency: Duration::from_millis(50),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for FakeGeo {
    async fn lookup(&self) -> Result<GeoPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        match self.reply {
            GeoReply::Country(name, code) => Ok(GeoPayload {
                country: Some(name.into()),
                country_code: Some(code.into()),
            }),
            GeoReply::Fail => Err(FridayError::MalformedPayload("connection reset".into())),
            GeoReply::Malformed => Ok(GeoPayload {
                country: Some("Nowhere".into()),
                country_code: None,
            }),
            GeoReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(FridayError::Cancelled)
            }
        }
    }
}

/// Signup API double that records every request it receives.
pub struct RecordingSignup {
    pub requests: Mutex<Vec<SignupRequest>>,
    latency: Duration,
    reject_with: Option<&'static str>,
}

impl RecordingSignup {
    pub fn accepting() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            latency: Duration::from_millis(100),
            reject_with: None,
        }
    }

    pub fn rejecting(message: &'static str) -> Self {
        Self {
            reject_with: Some(message),
            ..Self::accepting()
        }
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SignupApi for RecordingSignup {
    async fn submit(&self, request: &SignupRequest) -> Result<SignupResponse> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.latency).await;
        Ok(match self.reject_with {
            Some(message) => SignupResponse {
                success: false,
                user: None,
                invitation: None,
                message: Some(message.into()),
            },
            None => SignupResponse {
                success: true,
                user: Some(User {
                    id: Some(1),
                    name: request.name.clone(),
                    email: request.email.clone(),
                }),
                invitation: None,
                message: None,
            },
        })
    }
}
