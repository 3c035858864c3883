// crates/friday-core/src/model/signup.rs
use super::city::CityResult;
use super::validate;
use crate::error::{FridayError, Result};
use serde::{Deserialize, Serialize};

/// Where the person says they live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CitySelection {
    /// Picked from the typeahead results.
    Listed { city_id: u64, state: Option<String> },
    /// Typed by hand because the city was not listed.
    Other { city: String, state: Option<String> },
}

impl CitySelection {
    pub fn from_result(city: &CityResult) -> Self {
        CitySelection::Listed {
            city_id: city.id,
            state: city.state_code.clone().or_else(|| {
                (!city.state.is_empty()).then(|| city.state.clone())
            }),
        }
    }
}

/// The waitlist form as filled in, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub city: CitySelection,
}

/// Validated request body for `POST /waitlist`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl SignupForm {
    /// Checks every field and returns all failures at once.
    pub fn validate(&self) -> Result<SignupRequest> {
        let mut errors = Vec::new();
        validate::name("name", &self.name, &mut errors);
        validate::email("email", &self.email, &mut errors);

        let (city_id, city, state) = match &self.city {
            CitySelection::Listed { city_id, state } => {
                if *city_id == 0 {
                    errors.push(crate::error::FieldError::new(
                        "city",
                        "Please pick a city from the list",
                    ));
                }
                (Some(*city_id), None, clean(state))
            }
            CitySelection::Other { city, state } => {
                validate::required("city", "City", city, &mut errors);
                (None, Some(city.trim().to_owned()), clean(state))
            }
        };

        if !errors.is_empty() {
            return Err(FridayError::Validation(errors));
        }
        Ok(SignupRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_ascii_lowercase(),
            city_id,
            city,
            state,
        })
    }
}

fn clean(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default)]
    pub code: Option<String>,
    /// Place in the waitlist queue.
    #[serde(default)]
    pub position: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `{success, user, invitation}` or `{success: false, message}`.
#[derive(Clone, Debug, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub invitation: Option<Invitation>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, city: CitySelection) -> SignupForm {
        SignupForm {
            name: name.into(),
            email: email.into(),
            city,
        }
    }

    #[test]
    fn listed_city_serializes_city_id() {
        let req = form(
            " Ada ",
            "Ada@Example.com ",
            CitySelection::Listed {
                city_id: 1,
                state: Some("WA".into()),
            },
        )
        .validate()
        .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name":"Ada","email":"ada@example.com","city_id":1,"state":"WA"})
        );
    }

    #[test]
    fn other_city_serializes_city_text() {
        let req = form(
            "Ada",
            "ada@example.com",
            CitySelection::Other {
                city: " Walla Walla ".into(),
                state: Some("  ".into()),
            },
        )
        .validate()
        .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name":"Ada","email":"ada@example.com","city":"Walla Walla"})
        );
    }

    #[test]
    fn every_failing_field_is_reported() {
        let err = form("", "nope", CitySelection::Other { city: "".into(), state: None })
            .validate()
            .unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "city"]);
    }

    #[test]
    fn selection_from_result_prefers_state_code() {
        let city = CityResult {
            id: 9,
            display: "Portland, OR".into(),
            name: "Portland".into(),
            state: "Oregon".into(),
            state_code: Some("OR".into()),
            timezone: None,
        };
        assert_eq!(
            CitySelection::from_result(&city),
            CitySelection::Listed {
                city_id: 9,
                state: Some("OR".into())
            }
        );
    }

    #[test]
    fn failure_response_keeps_message() {
        let raw = r#"{"success":false,"message":"This email is already on the waitlist"}"#;
        let resp: SignupResponse = serde_json::from_str(raw).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("This email is already on the waitlist"));
    }
}
