use thiserror::Error;

/// Failure of a domain operation. Each variant maps to one HTTP status class.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Malformed or non-positive identifier
    #[error("Invalid ID: {message}")]
    InvalidId { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated, but the role or ownership check failed
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

macro_rules! constructors {
    ($($fn_name:ident => $variant:ident),+ $(,)?) => {
        impl DomainError {
            $(
                pub fn $fn_name(message: impl Into<String>) -> Self {
                    Self::$variant { message: message.into() }
                }
            )+
        }
    };
}

constructors! {
    not_found => NotFound,
    validation => Validation,
    invalid_id => InvalidId,
    unauthorized => Unauthorized,
    forbidden => Forbidden,
    conflict => Conflict,
    configuration => Configuration,
    internal => Internal,
    storage => Storage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        assert_eq!(
            DomainError::not_found("Program 42 not found").to_string(),
            "Not found: Program 42 not found"
        );
        assert_eq!(
            DomainError::conflict("Email already registered").to_string(),
            "Conflict: Email already registered"
        );
    }

    #[test]
    fn test_constructors_pick_variant() {
        assert!(matches!(DomainError::forbidden("x"), DomainError::Forbidden { .. }));
        assert!(matches!(DomainError::invalid_id("x"), DomainError::InvalidId { .. }));
        assert!(matches!(DomainError::storage("x"), DomainError::Storage { .. }));
    }
}
