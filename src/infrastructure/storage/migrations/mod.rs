//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::Executor;
use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// PostgreSQL migrator over the embedded schema migrations
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: schema_migrations(),
        }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Applies a single migration and records it in one transaction
    pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        (&mut *tx)
            .execute(sqlx::raw_sql(migration.up))
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, description = migration.description, "Applied migration");
        Ok(())
    }

    /// Reverts a single migration
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        (&mut *tx)
            .execute(sqlx::raw_sql(migration.down))
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        info!(version = migration.version, "Reverted migration");
        Ok(())
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        for migration in &self.migrations {
            self.run_migration(migration).await?;
        }
        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(current) = self.version().await? else {
            return Ok(());
        };

        match self.migrations.iter().find(|m| m.version == current) {
            Some(migration) => self.revert_migration(migration).await,
            None => Err(DomainError::configuration(format!(
                "Applied migration {} is unknown to this build",
                current
            ))),
        }
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    /// SQL to run when applying the migration
    pub up: &'static str,
    /// SQL to run when reverting the migration
    pub down: &'static str,
}

/// Embedded schema, applied in version order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create users and profiles",
            up: r#"
                CREATE TABLE users (
                    id BIGSERIAL PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    is_mentor BOOLEAN NOT NULL DEFAULT FALSE,
                    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
                    is_approved BOOLEAN NOT NULL DEFAULT FALSE,
                    email_verified BOOLEAN NOT NULL DEFAULT FALSE,
                    verification_token TEXT,
                    reset_token TEXT,
                    reset_token_expires_at TIMESTAMPTZ,
                    last_login_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                CREATE INDEX idx_users_verification_token ON users(verification_token);
                CREATE INDEX idx_users_reset_token ON users(reset_token);

                CREATE TABLE profiles (
                    id BIGSERIAL PRIMARY KEY,
                    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                    first_name TEXT NOT NULL DEFAULT '',
                    last_name TEXT NOT NULL DEFAULT '',
                    bio TEXT NOT NULL DEFAULT '',
                    skills TEXT NOT NULL DEFAULT '',
                    experience TEXT NOT NULL DEFAULT '',
                    linkedin TEXT NOT NULL DEFAULT '',
                    github TEXT NOT NULL DEFAULT '',
                    twitter TEXT NOT NULL DEFAULT '',
                    rate DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (rate >= 0),
                    available BOOLEAN NOT NULL DEFAULT TRUE,
                    timezone TEXT NOT NULL DEFAULT '',
                    profile_picture TEXT NOT NULL DEFAULT '',
                    notification_preferences TEXT NOT NULL DEFAULT '',
                    privacy_settings TEXT NOT NULL DEFAULT '',
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
            "#,
            down: "DROP TABLE IF EXISTS profiles; DROP TABLE IF EXISTS users;",
        },
        Migration {
            version: 2,
            description: "Create mentorship tables",
            up: r#"
                CREATE TABLE mentorship_programs (
                    id BIGSERIAL PRIMARY KEY,
                    mentor_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    duration TEXT NOT NULL,
                    price DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (price >= 0),
                    max_mentees INTEGER NOT NULL CHECK (max_mentees >= 1),
                    status TEXT NOT NULL CHECK (status IN ('active', 'closed')),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                CREATE INDEX idx_programs_mentor ON mentorship_programs(mentor_id);

                CREATE TABLE mentorship_requests (
                    id BIGSERIAL PRIMARY KEY,
                    mentee_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    program_id BIGINT NOT NULL REFERENCES mentorship_programs(id) ON DELETE CASCADE,
                    mentor_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    message TEXT NOT NULL DEFAULT '',
                    status TEXT NOT NULL CHECK (
                        status IN ('pending', 'approved', 'rejected', 'completed', 'cancelled')
                    ),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                CREATE INDEX idx_requests_mentor ON mentorship_requests(mentor_id, status);
                CREATE INDEX idx_requests_mentee ON mentorship_requests(mentee_id);

                CREATE TABLE mentorship_sessions (
                    id BIGSERIAL PRIMARY KEY,
                    request_id BIGINT NOT NULL REFERENCES mentorship_requests(id) ON DELETE CASCADE,
                    title TEXT NOT NULL DEFAULT '',
                    topic TEXT NOT NULL DEFAULT '',
                    start_time TIMESTAMPTZ NOT NULL,
                    end_time TIMESTAMPTZ NOT NULL,
                    notes TEXT NOT NULL DEFAULT '',
                    status TEXT NOT NULL CHECK (
                        status IN ('scheduled', 'completed', 'cancelled', 'no_show')
                    ),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CHECK (end_time > start_time)
                );
                CREATE INDEX idx_sessions_request ON mentorship_sessions(request_id);
                CREATE INDEX idx_sessions_start ON mentorship_sessions(start_time);

                CREATE TABLE session_feedback (
                    id BIGSERIAL PRIMARY KEY,
                    session_id BIGINT NOT NULL REFERENCES mentorship_sessions(id) ON DELETE CASCADE,
                    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                    comment TEXT NOT NULL DEFAULT '',
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE (session_id, user_id)
                );

                CREATE TABLE mentor_availability (
                    id BIGSERIAL PRIMARY KEY,
                    mentor_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
                    start_time TIME NOT NULL,
                    end_time TIME NOT NULL,
                    CHECK (end_time > start_time)
                );
                CREATE INDEX idx_availability_mentor ON mentor_availability(mentor_id);
            "#,
            down: r#"
                DROP TABLE IF EXISTS mentor_availability;
                DROP TABLE IF EXISTS session_feedback;
                DROP TABLE IF EXISTS mentorship_sessions;
                DROP TABLE IF EXISTS mentorship_requests;
                DROP TABLE IF EXISTS mentorship_programs;
            "#,
        },
        Migration {
            version: 3,
            description: "Create job board tables",
            up: r#"
                CREATE TABLE jobs (
                    id BIGSERIAL PRIMARY KEY,
                    title TEXT NOT NULL,
                    company TEXT NOT NULL,
                    location TEXT NOT NULL DEFAULT '',
                    description TEXT NOT NULL,
                    requirements TEXT NOT NULL DEFAULT '',
                    salary_range TEXT NOT NULL DEFAULT '',
                    job_type TEXT NOT NULL CHECK (job_type IN ('full-time', 'part-time', 'contract')),
                    experience_level TEXT NOT NULL CHECK (experience_level IN ('entry', 'mid', 'senior')),
                    remote_policy TEXT NOT NULL CHECK (remote_policy IN ('remote', 'hybrid', 'on-site')),
                    contact_email TEXT NOT NULL DEFAULT '',
                    status TEXT NOT NULL CHECK (status IN ('active', 'expired', 'closed')),
                    is_featured BOOLEAN NOT NULL DEFAULT FALSE,
                    created_by BIGINT NOT NULL REFERENCES users(id),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                CREATE INDEX idx_jobs_status ON jobs(status);

                CREATE TABLE job_applications (
                    id BIGSERIAL PRIMARY KEY,
                    job_id BIGINT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    status TEXT NOT NULL CHECK (status IN ('pending', 'reviewed', 'accepted', 'rejected')),
                    cover_letter TEXT NOT NULL DEFAULT '',
                    resume_url TEXT NOT NULL DEFAULT '',
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    UNIQUE (job_id, user_id)
                );
            "#,
            down: "DROP TABLE IF EXISTS job_applications; DROP TABLE IF EXISTS jobs;",
        },
    ]
}
