//! Session cookie tokens
//!
//! Wire format: `session_<user id>_<uuid>`. With a configured secret the token
//! is suffixed with `.<hex hmac-sha256>` over the unsigned part, and tokens
//! without a valid signature are refused.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::{DomainError, Identity, UserId};

type HmacSha256 = Hmac<Sha256>;

const PREFIX: &str = "session";

#[derive(Clone)]
pub struct SessionTokenCodec {
    secret: Option<Vec<u8>>,
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("signed", &self.secret.is_some())
            .finish()
    }
}

impl SessionTokenCodec {
    /// Legacy tokens, compatible with existing cookies but forgeable
    pub fn unsigned() -> Self {
        Self { secret: None }
    }

    pub fn signed(secret: &str) -> Result<Self, DomainError> {
        if secret.trim().is_empty() {
            return Err(DomainError::configuration("Session secret cannot be empty"));
        }
        Ok(Self {
            secret: Some(secret.as_bytes().to_vec()),
        })
    }

    pub fn from_secret(secret: Option<&str>) -> Result<Self, DomainError> {
        match secret {
            Some(secret) => Self::signed(secret),
            None => Ok(Self::unsigned()),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    pub fn issue(&self, user_id: UserId) -> Result<String, DomainError> {
        let body = format!("{}_{}_{}", PREFIX, user_id, Uuid::new_v4());

        match &self.secret {
            Some(secret) => {
                let mut mac = mac_for(secret)?;
                mac.update(body.as_bytes());
                let signature = hex::encode(mac.finalize().into_bytes());
                Ok(format!("{}.{}", body, signature))
            }
            None => Ok(body),
        }
    }

    /// Validate a token and return the identity it carries
    pub fn parse(&self, token: &str) -> Result<Identity, DomainError> {
        let body = match &self.secret {
            Some(secret) => {
                let (body, signature) = token
                    .rsplit_once('.')
                    .ok_or_else(|| DomainError::unauthorized("Session token is not signed"))?;
                let signature = hex::decode(signature)
                    .map_err(|_| DomainError::unauthorized("Malformed session signature"))?;

                let mut mac = mac_for(secret)?;
                mac.update(body.as_bytes());
                mac.verify_slice(&signature)
                    .map_err(|_| DomainError::unauthorized("Invalid session signature"))?;
                body
            }
            None => token,
        };

        parse_body(body)
    }
}

fn mac_for(secret: &[u8]) -> Result<HmacSha256, DomainError> {
    HmacSha256::new_from_slice(secret)
        .map_err(|e| DomainError::configuration(format!("Invalid session secret: {}", e)))
}

fn parse_body(body: &str) -> Result<Identity, DomainError> {
    let parts: Vec<&str> = body.split('_').collect();

    if parts.len() != 3 || parts[0] != PREFIX || parts[2].is_empty() {
        return Err(DomainError::unauthorized("Invalid session token format"));
    }

    let raw_id = parts[1]
        .parse::<i64>()
        .map_err(|_| DomainError::unauthorized("Invalid user id in session token"))?;
    let user_id = UserId::new(raw_id)
        .map_err(|_| DomainError::unauthorized("Invalid user id in session token"))?;

    Ok(Identity::new(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_unsigned_round_trip() {
        let codec = SessionTokenCodec::unsigned();
        let token = codec.issue(user(42)).unwrap();

        assert!(token.starts_with("session_42_"));
        assert_eq!(codec.parse(&token).unwrap().user_id(), user(42));
    }

    #[test]
    fn test_legacy_format_accepted_when_unsigned() {
        let codec = SessionTokenCodec::unsigned();
        let identity = codec
            .parse("session_7_550e8400-e29b-41d4-a716-446655440000")
            .unwrap();
        assert_eq!(identity.user_id(), user(7));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = SessionTokenCodec::unsigned();

        for token in [
            "",
            "session",
            "session_7",
            "token_7_abc",
            "session_x_abc",
            "session_0_abc",
            "session_-4_abc",
            "session_7_",
            "session_7_abc_extra",
        ] {
            let err = codec.parse(token).unwrap_err();
            assert!(
                matches!(err, DomainError::Unauthorized { .. }),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_signed_round_trip() {
        let codec = SessionTokenCodec::signed("top-secret").unwrap();
        let token = codec.issue(user(9)).unwrap();

        assert!(token.contains('.'));
        assert_eq!(codec.parse(&token).unwrap().user_id(), user(9));
    }

    #[test]
    fn test_signed_codec_rejects_tampering() {
        let codec = SessionTokenCodec::signed("top-secret").unwrap();
        let token = codec.issue(user(9)).unwrap();

        let forged = token.replacen("session_9_", "session_1_", 1);
        assert!(codec.parse(&forged).is_err());

        let unsigned = token.rsplit_once('.').unwrap().0;
        assert!(codec.parse(unsigned).is_err());

        let other = SessionTokenCodec::signed("another-secret").unwrap();
        assert!(other.parse(&token).is_err());
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert!(matches!(
            SessionTokenCodec::signed("  "),
            Err(DomainError::Configuration { .. })
        ));
        assert!(!SessionTokenCodec::from_secret(None).unwrap().is_signed());
    }
}
