// crates/friday-core/src/model/feedback.rs
use super::validate;
use crate::error::{FieldError, FridayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    General,
    Bug,
    Feature,
    Partnership,
    Other,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 5] = [
        FeedbackCategory::General,
        FeedbackCategory::Bug,
        FeedbackCategory::Feature,
        FeedbackCategory::Partnership,
        FeedbackCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::General => "general",
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::Partnership => "partnership",
            FeedbackCategory::Other => "other",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackCategory {
    type Err = FridayError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                FridayError::Validation(vec![FieldError::new(
                    "category",
                    format!("Unknown category {s:?}"),
                )])
            })
    }
}

/// Body of the contact/feedback form, forwarded to the email dispatch service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub name: String,
    pub email: String,
    pub category: FeedbackCategory,
    pub message: String,
}

impl FeedbackMessage {
    /// Returns a trimmed copy, or every field error found.
    pub fn validate(&self) -> Result<FeedbackMessage> {
        let mut errors = Vec::new();
        validate::name("name", &self.name, &mut errors);
        validate::email("email", &self.email, &mut errors);
        validate::required("message", "Message", &self.message, &mut errors);
        if self.message.trim().chars().count() > validate::MAX_MESSAGE_CHARS {
            errors.push(FieldError::new(
                "message",
                format!(
                    "Message must be at most {} characters",
                    validate::MAX_MESSAGE_CHARS
                ),
            ));
        }
        if !errors.is_empty() {
            return Err(FridayError::Validation(errors));
        }
        Ok(FeedbackMessage {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            category: self.category,
            message: self.message.trim().to_owned(),
        })
    }
}

/// `{success, error?}` from the email dispatch service.
#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
