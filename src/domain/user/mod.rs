//! User domain
//!
//! Accounts, role flags, credential validation and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId, UserRole, UserStats};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_username, UserValidationError,
    MIN_PASSWORD_LENGTH,
};
