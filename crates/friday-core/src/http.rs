// crates/friday-core/src/http.rs

//! `reqwest` implementations of the boundary traits.
//!
//! One [`reqwest::Client`] is built from the [`ClientConfig`] and shared by
//! every client, so connection pooling and the request timeout apply across
//! the board.

use crate::config::ClientConfig;
use crate::error::{FridayError, Result};
use crate::feedback::FeedbackApi;
use crate::geo::service::GeoLookup;
use crate::geo::GeoPayload;
use crate::model::{
    CityResult, FeedbackMessage, FeedbackResponse, SearchResponse, SignupRequest, SignupResponse,
};
use crate::search::controller::SearchApi;
use crate::signup::SignupApi;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const USER_AGENT: &str = concat!("friday-core/", env!("CARGO_PKG_VERSION"));

pub fn build_client(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()?)
}

/// Every HTTP-backed boundary client, sharing one connection pool.
#[derive(Clone)]
pub struct HttpClients {
    pub search: HttpSearchApi,
    pub geo: HttpGeoLookup,
    pub signup: HttpSignupApi,
    pub feedback: HttpFeedbackApi,
}

impl HttpClients {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = build_client(config)?;
        Ok(Self {
            search: HttpSearchApi::new(client.clone(), config.endpoint("cities")),
            geo: HttpGeoLookup::new(client.clone(), config.geo_lookup_url.clone()),
            signup: HttpSignupApi::new(client.clone(), config.endpoint("waitlist")),
            feedback: HttpFeedbackApi::new(client, config.feedback_url.clone()),
        })
    }
}

/// Business endpoints answer `{success:false, message}` with 4xx codes, so
/// the body is parsed before the status is judged.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str(&body) {
        Ok(v) => Ok(v),
        Err(_) if !status.is_success() => Err(FridayError::MalformedPayload(format!(
            "HTTP {status} with unexpected body"
        ))),
        Err(e) => Err(FridayError::MalformedPayload(e.to_string())),
    }
}

#[derive(Clone, Debug)]
pub struct HttpSearchApi {
    client: Client,
    endpoint: String,
}

impl HttpSearchApi {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, term: &str) -> Result<Vec<CityResult>> {
        debug!(endpoint = %self.endpoint, term, "GET city search");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("search", term)])
            .send()
            .await?;
        decode_body::<SearchResponse>(response).await?.into_results()
    }
}

#[derive(Clone, Debug)]
pub struct HttpGeoLookup {
    client: Client,
    url: String,
}

impl HttpGeoLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl GeoLookup for HttpGeoLookup {
    async fn lookup(&self) -> Result<GeoPayload> {
        debug!(url = %self.url, "GET geo lookup");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        decode_body(response).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpSignupApi {
    client: Client,
    endpoint: String,
}

impl HttpSignupApi {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SignupApi for HttpSignupApi {
    async fn submit(&self, request: &SignupRequest) -> Result<SignupResponse> {
        debug!(endpoint = %self.endpoint, "POST waitlist signup");
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        decode_body(response).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpFeedbackApi {
    client: Client,
    endpoint: String,
}

impl HttpFeedbackApi {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn send(&self, message: &FeedbackMessage) -> Result<FeedbackResponse> {
        debug!(endpoint = %self.endpoint, "POST feedback");
        let response = self.client.post(&self.endpoint).json(message).send().await?;
        decode_body(response).await
    }
}
