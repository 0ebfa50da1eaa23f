//! Authenticated caller identity

use serde::Serialize;

use super::id::UserId;

/// The verified user id of the caller, produced by session validation.
///
/// Services take this explicitly instead of reading ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    user_id: UserId,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// True when this identity belongs to `user`
    pub fn is(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

impl From<UserId> for Identity {
    fn from(user_id: UserId) -> Self {
        Self::new(user_id)
    }
}
