// crates/friday-core/src/model/city.rs
use crate::error::{FridayError, Result};
use crate::text::{equals_folded, fold_key};
use serde::{Deserialize, Serialize};

/// One candidate returned by the city search endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub id: u64,
    /// Display label, e.g. "Seattle, WA".
    #[serde(alias = "label")]
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl CityResult {
    pub fn label(&self) -> &str {
        &self.display
    }

    /// Accent- and case-insensitive match on either the label or the bare name.
    pub fn matches(&self, typed: &str) -> bool {
        equals_folded(&self.display, typed) || (!self.name.is_empty() && equals_folded(&self.name, typed))
    }

    pub fn label_contains(&self, typed: &str) -> bool {
        fold_key(&self.display).contains(&fold_key(typed.trim()))
    }
}

/// Wire shape of `GET /cities?search=<term>`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, alias = "results")]
    pub cities: Vec<CityResult>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn into_results(self) -> Result<Vec<CityResult>> {
        if self.success {
            Ok(self.cities)
        } else {
            Err(FridayError::Upstream(
                self.message.unwrap_or_else(|| "City search failed".into()),
            ))
        }
    }
}

/// Picks the result the user already typed out in full, if any.
pub fn exact_match<'a>(results: &'a [CityResult], typed: &str) -> Option<&'a CityResult> {
    results.iter().find(|c| c.matches(typed))
}
