//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::domain::id::UserId;

/// Role label derived from the user's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Mentor,
    Mentee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Mentor => "mentor",
            Self::Mentee => "mentee",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_mentor: bool,
    pub is_admin: bool,
    /// Mentors start unapproved until an admin signs off
    pub is_approved: bool,
    pub email_verified: bool,
    #[serde(skip_serializing, default)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        if self.is_admin {
            UserRole::Admin
        } else if self.is_mentor {
            UserRole::Mentor
        } else {
            UserRole::Mentee
        }
    }

    /// Only approved mentors may publish programs
    pub fn can_offer_programs(&self) -> bool {
        self.is_mentor && self.is_approved
    }

    /// Admins log in without a verified email
    pub fn can_login(&self) -> bool {
        self.is_admin || self.email_verified
    }

    pub fn mark_email_verified(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
        self.touch();
    }

    /// Admin decision on a mentor account. Approval also vouches for the email.
    pub fn set_approval(&mut self, approved: bool) {
        self.is_approved = approved;
        if approved {
            self.email_verified = true;
        }
        self.touch();
    }

    pub fn issue_reset_token(&mut self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        self.reset_token = Some(token.into());
        self.reset_token_expires_at = Some(expires_at);
        self.touch();
    }

    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_token, self.reset_token_expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    /// Replace the password and consume any pending reset token
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.reset_token = None;
        self.reset_token_expires_at = None;
        self.touch();
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Account data for a user that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_mentor: bool,
    pub is_admin: bool,
    pub is_approved: bool,
    pub email_verified: bool,
    pub verification_token: Option<String>,
}

impl NewUser {
    /// Mentees are approved immediately but must verify their email
    pub fn mentee(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        verification_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_mentor: false,
            is_admin: false,
            is_approved: true,
            email_verified: false,
            verification_token: Some(verification_token.into()),
        }
    }

    /// Mentors skip email verification but wait for admin approval
    pub fn mentor(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_mentor: true,
            is_admin: false,
            is_approved: false,
            email_verified: true,
            verification_token: None,
        }
    }

    pub fn admin(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_mentor: false,
            is_admin: true,
            is_approved: true,
            email_verified: true,
            verification_token: None,
        }
    }

    /// Materialize with a storage-assigned id
    pub fn into_user(self, id: UserId) -> User {
        let now = Utc::now();

        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            is_mentor: self.is_mentor,
            is_admin: self.is_admin,
            is_approved: self.is_approved,
            email_verified: self.email_verified,
            verification_token: self.verification_token,
            reset_token: None,
            reset_token_expires_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Head counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_users: i64,
    pub total_mentors: i64,
    pub total_mentees: i64,
    pub pending_mentors: i64,
    pub admins: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(new: NewUser) -> User {
        new.into_user(UserId::new(1).unwrap())
    }

    #[test]
    fn test_mentee_defaults() {
        let u = user(NewUser::mentee("ana", "ana@example.com", "hash", "tok"));
        assert!(u.is_approved);
        assert!(!u.email_verified);
        assert_eq!(u.verification_token.as_deref(), Some("tok"));
        assert_eq!(u.role(), UserRole::Mentee);
        assert!(!u.can_login());
    }

    #[test]
    fn test_mentor_requires_approval() {
        let mut u = user(NewUser::mentor("bo", "bo@example.com", "hash"));
        assert!(!u.can_offer_programs());
        assert!(u.email_verified);

        u.set_approval(true);
        assert!(u.can_offer_programs());
        assert_eq!(u.role(), UserRole::Mentor);
    }

    #[test]
    fn test_admin_can_login_unverified() {
        let mut u = user(NewUser::admin("root", "root@example.com", "hash"));
        u.email_verified = false;
        assert!(u.can_login());
        assert_eq!(u.role(), UserRole::Admin);
    }

    #[test]
    fn test_reset_token_expiry() {
        let mut u = user(NewUser::mentee("ana", "ana@example.com", "hash", "tok"));
        let now = Utc::now();
        u.issue_reset_token("reset", now + Duration::hours(24));

        assert!(u.reset_token_valid_at(now));
        assert!(!u.reset_token_valid_at(now + Duration::hours(25)));

        u.set_password_hash("new-hash");
        assert!(u.reset_token.is_none());
        assert!(!u.reset_token_valid_at(now));
    }

    #[test]
    fn test_serialization_hides_secrets() {
        let u = user(NewUser::mentee("ana", "ana@example.com", "secret-hash", "tok"));
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("tok"));
    }
}
