//! Outbound account notifications
//!
//! Mail delivery is out of scope; [`LogNotifier`] records what would be sent.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), DomainError>;

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), DomainError>;
}

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), DomainError> {
        info!(user_id = %user.id, email = %user.email, "Verification email queued");
        debug!(path = %format!("/auth/verify/{}", token), "Verification link");
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), DomainError> {
        info!(user_id = %user.id, email = %user.email, "Password reset email queued");
        debug!(path = %format!("/auth/password-reset/{}", token), "Password reset link");
        Ok(())
    }
}
