//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Registration is restricted to @{0} addresses")]
    EmailDomainNotAllowed(String),
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Validate a username
///
/// Rules:
/// - Minimum 3, maximum 50 characters
/// - Only alphanumeric characters, underscores, and hyphens
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate an email address, optionally restricting it to one domain
pub fn validate_email(email: &str, allowed_domain: Option<&str>) -> Result<(), UserValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    if let Some(domain) = allowed_domain {
        let domain = domain.trim_start_matches('@');
        let suffix = format!("@{}", domain.to_ascii_lowercase());

        if !email.to_ascii_lowercase().ends_with(&suffix) {
            return Err(UserValidationError::EmailDomainNotAllowed(domain.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("ana").is_ok());
        assert!(validate_username("mentor_01").is_ok());
        assert!(validate_username("jane-doe").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username(""), Err(UserValidationError::EmptyUsername));
        assert_eq!(
            validate_username("ab"),
            Err(UserValidationError::UsernameTooShort(3))
        );
        assert_eq!(
            validate_username("jane doe"),
            Err(UserValidationError::InvalidUsernameCharacter(' '))
        );
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH))
        );
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("ana@example.com", None).is_ok());
        assert!(validate_email("not-an-email", None).is_err());
        assert!(validate_email("ana@localhost", None).is_err());
    }

    #[test]
    fn test_email_domain_restriction() {
        assert!(validate_email("ops@underground-ops.dev", Some("underground-ops.dev")).is_ok());
        assert!(validate_email("OPS@Underground-Ops.dev", Some("@underground-ops.dev")).is_ok());
        assert_eq!(
            validate_email("ops@gmail.com", Some("underground-ops.dev")),
            Err(UserValidationError::EmailDomainNotAllowed(
                "underground-ops.dev".to_string()
            ))
        );
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = UserValidationError::EmptyUsername.into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
