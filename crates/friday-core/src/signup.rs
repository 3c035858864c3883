// crates/friday-core/src/signup.rs
use crate::error::{FridayError, Result};
use crate::gate::{FormGate, GateDecision, GateOutcome};
use crate::geo::service::GeoContext;
use crate::geo::GeoState;
use crate::model::{Invitation, SignupForm, SignupRequest, SignupResponse, User};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// `POST <signup-endpoint>` with a [`SignupRequest`] body.
#[async_trait]
pub trait SignupApi: Send + Sync {
    async fn submit(&self, request: &SignupRequest) -> Result<SignupResponse>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Geo still resolving; the button is disabled and nothing was sent.
    Suspended,
    /// Outside the launch region: show the alternate capture form instead.
    Fallback {
        country: String,
        country_code: String,
    },
    Registered {
        user: User,
        invitation: Option<Invitation>,
    },
}

/// The waitlist form's submit handler, gated on the visitor's region.
pub struct SignupController {
    api: Arc<dyn SignupApi>,
    geo: GeoContext,
    in_flight: AtomicBool,
}

impl SignupController {
    pub fn new(api: Arc<dyn SignupApi>, geo: GeoContext) -> Self {
        Self {
            api,
            geo,
            in_flight: AtomicBool::new(false),
        }
    }

    /// What the submit button should look like right now.
    pub fn decision(&self) -> GateDecision {
        self.geo.decision()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// One click of the submit button.
    ///
    /// Sends at most one request. A click while an earlier one is still in
    /// flight fails with [`FridayError::SubmissionInFlight`].
    pub async fn submit(&self, form: &SignupForm) -> Result<SubmitOutcome> {
        // One snapshot drives both the branch and the fallback payload.
        let state = self.geo.state();
        match FormGate::new(&state).run(|| self.register(form), || fallback(&state)) {
            GateOutcome::Suspended => {
                debug!("signup suspended until geo resolves");
                Ok(SubmitOutcome::Suspended)
            }
            GateOutcome::Fallback(outcome) => {
                debug!("signup redirected to alternate list");
                Ok(outcome)
            }
            GateOutcome::Primary(register) => register.await,
        }
    }

    async fn register(&self, form: &SignupForm) -> Result<SubmitOutcome> {
        let request = form.validate()?;
        let _guard = InFlight::acquire(&self.in_flight).ok_or(FridayError::SubmissionInFlight)?;

        info!(email = %request.email, "submitting waitlist signup");
        let response = self.api.submit(&request).await?;
        if !response.success {
            return Err(FridayError::Upstream(
                response
                    .message
                    .unwrap_or_else(|| "Signup failed, please try again".into()),
            ));
        }
        Ok(SubmitOutcome::Registered {
            user: response.user.unwrap_or_default(),
            invitation: response.invitation,
        })
    }
}

fn fallback(state: &GeoState) -> SubmitOutcome {
    SubmitOutcome::Fallback {
        country: state.country().unwrap_or_default().to_owned(),
        country_code: state.country_code().unwrap_or_default().to_owned(),
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
