//! Authentication infrastructure module
//!
//! Session tokens carried in role-specific cookies.

mod session;

pub use session::SessionTokenCodec;
