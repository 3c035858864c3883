// crates/friday-core/src/config.rs
use crate::error::{FridayError, Result};
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Endpoints and timing knobs of the client core.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub geo_lookup_url: String,
    pub feedback_url: String,
    pub debounce_ms: u64,
    pub min_query_chars: usize,
    pub geo_timeout_ms: u64,
    pub geo_ttl_secs: u64,
    /// ISO2 codes treated as the launch region.
    pub recognized_countries: Vec<String>,
    /// Where the durable store lives; `None` keeps it in memory.
    pub store_path: Option<PathBuf>,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.friday.app/v1".into(),
            geo_lookup_url: "https://ipapi.co/json/".into(),
            feedback_url: "https://api.friday.app/v1/feedback".into(),
            debounce_ms: 400,
            min_query_chars: 2,
            geo_timeout_ms: 5_000,
            geo_ttl_secs: 24 * 60 * 60,
            recognized_countries: vec!["US".into()],
            store_path: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    /// Loads a JSON config file; missing keys fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FridayError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| FridayError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `FRIDAY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup (the environment in production).
    /// Unparsable values are logged and skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FRIDAY_API_BASE") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("FRIDAY_GEO_URL") {
            self.geo_lookup_url = v;
        }
        if let Some(v) = lookup("FRIDAY_FEEDBACK_URL") {
            self.feedback_url = v;
        }
        try_parse(&lookup, "FRIDAY_DEBOUNCE_MS", &mut self.debounce_ms);
        try_parse(&lookup, "FRIDAY_MIN_QUERY_CHARS", &mut self.min_query_chars);
        try_parse(&lookup, "FRIDAY_GEO_TIMEOUT_MS", &mut self.geo_timeout_ms);
        try_parse(&lookup, "FRIDAY_GEO_TTL_SECS", &mut self.geo_ttl_secs);
        try_parse(&lookup, "FRIDAY_REQUEST_TIMEOUT_MS", &mut self.request_timeout_ms);
        if let Some(v) = lookup("FRIDAY_RECOGNIZED_COUNTRIES") {
            self.recognized_countries = v
                .split(',')
                .map(|x| x.trim().to_ascii_uppercase())
                .filter(|x| !x.is_empty())
                .collect();
        }
        if let Some(v) = lookup("FRIDAY_STORE_PATH") {
            self.store_path = Some(PathBuf::from(v));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("geo_lookup_url", &self.geo_lookup_url),
            ("feedback_url", &self.feedback_url),
        ] {
            if url.trim().is_empty() {
                return Err(FridayError::Config(format!("{name} must not be empty")));
            }
        }
        if self.debounce_ms == 0 {
            return Err(FridayError::Config("debounce_ms must be positive".into()));
        }
        if self.min_query_chars == 0 {
            return Err(FridayError::Config("min_query_chars must be positive".into()));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn geo_timeout(&self) -> Duration {
        Duration::from_millis(self.geo_timeout_ms)
    }

    pub fn geo_ttl(&self) -> Duration {
        Duration::from_secs(self.geo_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `{api_base}/{path}` without doubled slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn try_parse<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(v) => {
            info!("{key} set to {v}");
            *slot = v;
        }
        Err(e) => warn!("Invalid {key} value {raw:?}: {e}, keeping {slot}"),
    }
}
