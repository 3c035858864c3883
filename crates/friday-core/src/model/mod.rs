// crates/friday-core/src/model/mod.rs
pub mod city;
pub mod feedback;
pub mod signup;
pub mod validate;

pub use city::{CityResult, SearchResponse};
pub use feedback::{FeedbackCategory, FeedbackMessage, FeedbackResponse};
pub use signup::{CitySelection, Invitation, SignupForm, SignupRequest, SignupResponse, User};
