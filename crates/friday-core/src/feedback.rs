// crates/friday-core/src/feedback.rs
use crate::error::{FridayError, Result};
use crate::model::{FeedbackMessage, FeedbackResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// The email dispatch service behind the contact form.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    async fn send(&self, message: &FeedbackMessage) -> Result<FeedbackResponse>;
}

pub struct FeedbackClient {
    api: Arc<dyn FeedbackApi>,
}

impl FeedbackClient {
    pub fn new(api: Arc<dyn FeedbackApi>) -> Self {
        Self { api }
    }

    /// Validates, then sends once. No retry on failure.
    pub async fn send(&self, message: &FeedbackMessage) -> Result<()> {
        let message = message.validate()?;
        let response = self.api.send(&message).await?;
        if !response.success {
            return Err(FridayError::Upstream(
                response
                    .error
                    .unwrap_or_else(|| "Failed to send message".into()),
            ));
        }
        info!(category = %message.category, "feedback sent");
        Ok(())
    }
}
