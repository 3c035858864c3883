// crates/friday-core/src/model/validate.rs
use crate::error::FieldError;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_MESSAGE_CHARS: usize = 5_000;

pub fn name(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    let v = value.trim();
    if v.is_empty() {
        errors.push(FieldError::new(field, "Name is required"));
    } else if v.chars().count() > MAX_NAME_CHARS {
        errors.push(FieldError::new(
            field,
            format!("Name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
}

pub fn email(field: &'static str, value: &str, errors: &mut Vec<FieldError>) {
    let v = value.trim();
    if v.is_empty() {
        errors.push(FieldError::new(field, "Email is required"));
    } else if !is_valid_email(v) {
        errors.push(FieldError::new(field, "Please enter a valid email address"));
    }
}

pub fn required(field: &'static str, label: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    }
}

/// `local@domain.tld`: one `@`, no whitespace, every domain label non-empty.
pub fn is_valid_email(v: &str) -> bool {
    if v.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = v.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@example..com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
    }

    #[test]
    fn long_names_are_rejected() {
        let mut errors = Vec::new();
        name("name", &"x".repeat(MAX_NAME_CHARS + 1), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }
}
