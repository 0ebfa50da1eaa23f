//! API middleware components

pub mod admin_auth;
pub mod cookies;
pub mod logging;
pub mod metrics;
pub mod recovery;
pub mod security;
pub mod user_auth;

pub use admin_auth::RequireAdmin;
pub use cookies::{clear_session_cookie_headers, session_cookie_headers};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use recovery::{install_panic_hook, recovery_layer};
pub use security::{path_validation_middleware, security_headers_middleware};
pub use user_auth::{RequireMentor, RequireUser};
