//! Typed Input Validators
//!
//! One explicit validator per operation, run before any store access.
//! Each returns the parsed values or a structured list of field-level
//! errors, replacing what a runtime schema library would do
//! implicitly.

use crate::domain::value_object::email::Email;
use crate::error::{AccountsError, AccountsResult, FieldError};
use platform::password::MIN_PASSWORD_LENGTH;

const MSG_NAME_REQUIRED: &str = "Name is required.";
const MSG_INVALID_EMAIL: &str = "Invalid email address.";
const MSG_ENTER_VALID_EMAIL: &str = "Enter a valid email address.";
const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long.";
const MSG_PASSWORDS_MISMATCH: &str = "Passwords do not match.";

fn password_too_short(password: &str) -> bool {
    password.chars().count() < MIN_PASSWORD_LENGTH
}

/// Registration: name, email, password + confirmation
pub fn registration(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> AccountsResult<Email> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(FieldError::new("name", MSG_NAME_REQUIRED));
    }

    let parsed = Email::new(email);
    if parsed.is_err() {
        errors.push(FieldError::new("email", MSG_INVALID_EMAIL));
    }

    if password_too_short(password) {
        errors.push(FieldError::new("password", MSG_PASSWORD_TOO_SHORT));
    }
    if password_too_short(confirm) {
        errors.push(FieldError::new("confirm", MSG_PASSWORD_TOO_SHORT));
    } else if password != confirm {
        errors.push(FieldError::new("confirm", MSG_PASSWORDS_MISMATCH));
    }

    match parsed {
        Ok(email) if errors.is_empty() => Ok(email),
        _ => Err(AccountsError::Validation(errors)),
    }
}

/// Password sign-in: email + password
pub fn sign_in(email: &str, password: &str) -> AccountsResult<Email> {
    let mut errors = Vec::new();

    let parsed = Email::new(email);
    if parsed.is_err() {
        errors.push(FieldError::new("email", MSG_ENTER_VALID_EMAIL));
    }

    if password_too_short(password) {
        errors.push(FieldError::new("password", MSG_PASSWORD_TOO_SHORT));
    }

    match parsed {
        Ok(email) if errors.is_empty() => Ok(email),
        _ => Err(AccountsError::Validation(errors)),
    }
}

/// Email-only operations (reset request, magic-link request)
pub fn email_only(email: &str) -> AccountsResult<Email> {
    Email::new(email)
        .map_err(|_| AccountsError::invalid_field("email", MSG_ENTER_VALID_EMAIL))
}

/// Reset consumption: new password + confirmation
///
/// Length is checked here, before the token is even looked up, so
/// malformed requests are rejected cheaply.
pub fn reset_password(password: &str, confirm: &str) -> AccountsResult<()> {
    let mut errors = Vec::new();

    if password_too_short(password) {
        errors.push(FieldError::new("password", MSG_PASSWORD_TOO_SHORT));
    }
    if password_too_short(confirm) {
        errors.push(FieldError::new("confirm", MSG_PASSWORD_TOO_SHORT));
    } else if password != confirm {
        errors.push(FieldError::new("confirm", MSG_PASSWORDS_MISMATCH));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AccountsError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: AccountsError) -> Vec<&'static str> {
        match err {
            AccountsError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_ok() {
        let email = registration("Anna", "a@b.com", "Abcdefg1!", "Abcdefg1!").unwrap();
        assert_eq!(email.as_str(), "a@b.com");
    }

    #[test]
    fn test_registration_collects_all_field_errors() {
        let err = registration("", "nope", "short", "short").unwrap_err();
        let fields = fields(err);
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"confirm"));
    }

    #[test]
    fn test_registration_password_mismatch() {
        let err = registration("Anna", "a@b.com", "Abcdefg1!", "Abcdefg2!").unwrap_err();
        assert_eq!(fields(err), vec!["confirm"]);
    }

    #[test]
    fn test_sign_in_rejects_bad_email() {
        let err = sign_in("not-an-email", "Abcdefg1!").unwrap_err();
        assert_eq!(fields(err), vec!["email"]);
    }

    #[test]
    fn test_email_only() {
        assert!(email_only("a@b.com").is_ok());
        assert!(email_only("").is_err());
    }

    #[test]
    fn test_reset_password_short_rejected_before_lookup() {
        let err = reset_password("short", "short").unwrap_err();
        assert!(fields(err).contains(&"password"));
    }

    #[test]
    fn test_reset_password_mismatch() {
        let err = reset_password("Abcdefg1!", "Abcdefg2!").unwrap_err();
        assert_eq!(fields(err), vec!["confirm"]);
    }
}
