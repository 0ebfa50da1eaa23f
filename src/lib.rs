//! Nexus mentorship marketplace API
//!
//! Mentor and mentee accounts, mentorship programs with request and session
//! lifecycles, per-user dashboards, a job board and an admin back-office.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tracing::info;

use api::state::{AppState, CookieSettings};
use config::StorageBackend;
use domain::{JobRepository, MentorshipRepository, ProfileRepository, UserRepository};
use infrastructure::{
    auth::SessionTokenCodec,
    dashboard::{DashboardService, ServiceDashboardSource},
    job::{InMemoryJobRepository, JobService, PostgresJobRepository},
    logging::LoggingHandle,
    mentorship::{InMemoryMentorshipRepository, MentorshipService, PostgresMentorshipRepository},
    notification::LogNotifier,
    profile::{InMemoryProfileRepository, PostgresProfileRepository, ProfileService},
    storage::{create_pool, MemoryDatabase, Migrator, PostgresMigrator},
    user::{Argon2Hasher, InMemoryUserRepository, PasswordHasher, PostgresUserRepository, UserService},
};

/// One repository per aggregate, all over the same backend
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub mentorships: Arc<dyn MentorshipRepository>,
    pub jobs: Arc<dyn JobRepository>,
}

impl Repositories {
    /// Process-local tables; data is lost on restart
    pub fn in_memory() -> Self {
        let db = MemoryDatabase::new();

        Self {
            users: Arc::new(InMemoryUserRepository::new(db.clone())),
            profiles: Arc::new(InMemoryProfileRepository::new(db.clone())),
            mentorships: Arc::new(InMemoryMentorshipRepository::new(db.clone())),
            jobs: Arc::new(InMemoryJobRepository::new(db)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
            mentorships: Arc::new(PostgresMentorshipRepository::new(pool.clone())),
            jobs: Arc::new(PostgresJobRepository::new(pool)),
        }
    }
}

/// Wire services over the given repositories
pub fn build_app_state(
    config: &AppConfig,
    repositories: Repositories,
    hasher: Arc<dyn PasswordHasher>,
    logging: LoggingHandle,
) -> Result<AppState, domain::DomainError> {
    let sessions = SessionTokenCodec::from_secret(config.auth.session_secret.as_deref())?;
    if !sessions.is_signed() {
        tracing::warn!("auth.session_secret is not set; session tokens are unsigned");
    }

    let user_service = Arc::new(
        UserService::new(
            repositories.users.clone(),
            hasher,
            Arc::new(LogNotifier),
        )
        .with_allowed_email_domain(config.registration.allowed_email_domain.clone()),
    );
    let profile_service = Arc::new(ProfileService::new(
        repositories.profiles.clone(),
        repositories.mentorships.clone(),
    ));
    let mentorship_service = Arc::new(MentorshipService::new(
        repositories.users,
        repositories.mentorships,
        repositories.profiles,
    ));
    let job_service = Arc::new(JobService::new(repositories.jobs));

    let source = ServiceDashboardSource::new(profile_service.clone(), mentorship_service.clone());
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::new(source),
        Duration::from_millis(config.dashboard.section_timeout_ms),
    ));

    Ok(AppState {
        user_service,
        profile_service,
        mentorship_service,
        job_service,
        dashboard_service,
        sessions,
        cookies: CookieSettings {
            ttl_hours: config.auth.session_ttl_hours,
            secure: config.auth.secure_cookies,
        },
        logging,
        development: config.app.development,
    })
}

/// Create the application state for the configured storage backend.
/// PostgreSQL schemas are migrated before the state is returned.
pub async fn create_app_state_with_config(
    config: &AppConfig,
    logging: LoggingHandle,
) -> anyhow::Result<AppState> {
    let repositories = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Repositories::in_memory()
        }
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&config.database).await?;

            PostgresMigrator::new(pool.clone()).run().await?;
            info!("Database migrations applied");

            Repositories::postgres(pool)
        }
    };

    let state = build_app_state(config, repositories, Arc::new(Argon2Hasher::new()), logging)?;
    Ok(state)
}
