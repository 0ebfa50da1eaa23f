//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::SessionTokenCodec;
use crate::infrastructure::dashboard::DashboardService;
use crate::infrastructure::job::JobService;
use crate::infrastructure::logging::LoggingHandle;
use crate::infrastructure::mentorship::MentorshipService;
use crate::infrastructure::profile::ProfileService;
use crate::infrastructure::user::UserService;

/// Attributes of the session cookies set at login
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub ttl_hours: i64,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            secure: true,
        }
    }
}

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub profile_service: Arc<ProfileService>,
    pub mentorship_service: Arc<MentorshipService>,
    pub job_service: Arc<JobService>,
    pub dashboard_service: Arc<DashboardService>,
    pub sessions: SessionTokenCodec,
    pub cookies: CookieSettings,
    pub logging: LoggingHandle,
    /// Echo panic details in 500 responses
    pub development: bool,
}
