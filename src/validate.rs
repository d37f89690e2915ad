//! Client-side signup validation.
//!
//! Validation runs before any network call and reports every violated field
//! at once, so the user sees all problems in a single pass.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Signup form contents. Also the `POST /api/signup` body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Per-field validation messages. `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl SignupErrors {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }

    /// Drop the message for one field (called when the user edits it).
    pub fn clear_field(&mut self, field: SignupField) {
        match field {
            SignupField::FirstName => self.first_name = None,
            SignupField::LastName => self.last_name = None,
            SignupField::Email => self.email = None,
            SignupField::Password => self.password = None,
            SignupField::ConfirmPassword => self.confirm_password = None,
        }
    }
}

/// Identifies a signup form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("email pattern is valid")
    })
}

/// Minimal RFC-ish email check: a local part followed by `@` and anything.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email_regex().is_match(email)
}

/// Password rule: length >= 8, at least one digit, one lowercase, one
/// uppercase, one non-alphanumeric, and no whitespace anywhere.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| !c.is_alphanumeric())
        && !password.chars().any(|c| c.is_whitespace())
}

/// Validate the whole form. Never short-circuits.
pub fn validate_signup(form: &SignupForm) -> SignupErrors {
    let mut errors = SignupErrors::default();

    if form.first_name.trim().is_empty() {
        errors.first_name = Some("First name is required".to_string());
    }

    if form.last_name.trim().is_empty() {
        errors.last_name = Some("Last name is required".to_string());
    }

    if !is_valid_email(&form.email) {
        errors.email = Some("Valid email is required".to_string());
    }

    if !is_valid_password(&form.password) {
        errors.password = Some(
            "Password must be at least 8 characters with uppercase, lowercase, number and special character"
                .to_string(),
        );
    }

    if form.password != form.confirm_password {
        errors.confirm_password = Some("Passwords do not match".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!pass".to_string(),
            confirm_password: "Str0ng!pass".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_signup(&valid_form()).is_empty());
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        // The rule is deliberately loose about the domain part.
        assert!(is_valid_email("user@localhost"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@missing-local.com"));
        assert!(!is_valid_email("spa ce@example.com"));
    }

    #[test]
    fn test_password_rule_accepts() {
        assert!(is_valid_password("Str0ng!pass"));
        assert!(is_valid_password("aB3$efgh"));
        assert!(is_valid_password("!!!!aB3!!!!"));
    }

    #[test]
    fn test_password_rule_rejects() {
        assert!(!is_valid_password("aB3$efg")); // too short
        assert!(!is_valid_password("AB3$EFGH")); // no lowercase
        assert!(!is_valid_password("ab3$efgh")); // no uppercase
        assert!(!is_valid_password("aBc$efgh")); // no digit
        assert!(!is_valid_password("aB3defgh")); // no special
        assert!(!is_valid_password("aB3$ efgh")); // whitespace
        assert!(!is_valid_password("")); // empty
    }

    /// Removing any required character class from a valid password must
    /// invalidate it.
    #[test]
    fn test_password_rule_monotonic_in_each_class() {
        let valid = "aaB3$efgh";
        assert!(is_valid_password(valid));

        let without = |pred: fn(char) -> bool| -> String {
            valid.chars().filter(|c| !pred(*c)).collect()
        };

        let no_digits = without(|c| c.is_ascii_digit());
        let no_lower = without(|c| c.is_lowercase());
        let no_upper = without(|c| c.is_uppercase());
        let no_special = without(|c| !c.is_alphanumeric());

        for stripped in [no_digits, no_lower, no_upper, no_special] {
            assert!(
                !is_valid_password(&stripped),
                "expected {:?} to be rejected",
                stripped
            );
        }
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let form = SignupForm {
            first_name: "  ".to_string(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            password: "weak".to_string(),
            confirm_password: "different".to_string(),
        };
        let errors = validate_signup(&form);
        assert!(errors.first_name.is_some());
        assert!(errors.last_name.is_some());
        assert!(errors.email.is_some());
        assert!(errors.password.is_some());
        assert_eq!(
            errors.confirm_password.as_deref(),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_mismatched_confirm_only() {
        let mut form = valid_form();
        form.confirm_password = "Str0ng!pas".to_string();
        let errors = validate_signup(&form);
        assert_eq!(
            errors.confirm_password.as_deref(),
            Some("Passwords do not match")
        );
        assert!(errors.password.is_none());
        assert!(errors.email.is_none());
    }

    #[test]
    fn test_clear_field() {
        let mut errors = validate_signup(&SignupForm::default());
        assert!(errors.email.is_some());
        errors.clear_field(SignupField::Email);
        assert!(errors.email.is_none());
        assert!(errors.password.is_some());
    }

    #[test]
    fn test_form_serializes_with_wire_names() {
        let json = serde_json::to_string(&valid_form()).expect("serialize form");
        assert!(json.contains("\"firstName\":\"Ada\""));
        assert!(json.contains("\"lastName\":\"Lovelace\""));
        assert!(json.contains("\"confirmPassword\""));
    }
}
