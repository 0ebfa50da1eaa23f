//! Numeric identifiers for database-assigned entities

use super::DomainError;

/// Declares a positive integer id newtype backed by a `BIGSERIAL` column
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Create an id, rejecting zero and negative values
            pub fn new(value: i64) -> Result<Self, DomainError> {
                if value <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{} must be a positive integer, got {}",
                        $label, value
                    )));
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| {
                    DomainError::invalid_id(format!("{} '{}' is not a number", $label, s))
                })?;
                Self::new(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// User identifier
    UserId,
    "user id"
);
numeric_id!(ProfileId, "profile id");
numeric_id!(ProgramId, "program id");
numeric_id!(RequestId, "request id");
numeric_id!(SessionId, "session id");
numeric_id!(FeedbackId, "feedback id");
numeric_id!(JobId, "job id");
numeric_id!(ApplicationId, "application id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_id_accepted() {
        let id = UserId::new(7).unwrap();
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_non_positive_id_rejected() {
        assert!(matches!(
            ProgramId::new(0),
            Err(DomainError::InvalidId { .. })
        ));
        assert!(ProgramId::new(-3).is_err());
    }

    #[test]
    fn test_parse_from_path_segment() {
        let id: RequestId = "12".parse().unwrap();
        assert_eq!(id.value(), 12);
        assert!("abc".parse::<RequestId>().is_err());
        assert!("-1".parse::<RequestId>().is_err());
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let id: SessionId = serde_json::from_str("5").unwrap();
        assert_eq!(id.value(), 5);
        assert!(serde_json::from_str::<SessionId>("0").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    }
}
