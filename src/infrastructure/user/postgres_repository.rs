//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::profile::NewProfile;
use crate::domain::user::{NewUser, User, UserId, UserRepository, UserStats};
use crate::domain::DomainError;
use crate::infrastructure::storage::{map_write_error, read_error, violated_constraint};

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, is_mentor, is_admin, is_approved, email_verified,
    verification_token, reset_token, reset_token_expires_at, last_login_at,
    created_at, updated_at
"#;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get user"))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get user"))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE LOWER(email) = LOWER($1)", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get user by email"))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("username", username).await
    }

    async fn get_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("verification_token", token).await
    }

    async fn get_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("reset_token", token).await
    }

    async fn create_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| read_error(e, "begin registration"))?;

        let sql = format!(
            r#"
            INSERT INTO users (username, email, password_hash, is_mentor, is_admin,
                               is_approved, email_verified, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_mentor)
            .bind(user.is_admin)
            .bind(user.is_approved)
            .bind(user.email_verified)
            .bind(&user.verification_token)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                let constraint = violated_constraint(&e).unwrap_or_default();
                map_write_error(e, "create user", || {
                    if constraint.contains("username") {
                        format!("Username '{}' is already taken", user.username)
                    } else {
                        format!("Email '{}' is already registered", user.email)
                    }
                })
            })?;

        let created = row_to_user(&row)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, first_name, last_name, bio, skills, experience,
                                  rate, timezone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(created.id.value())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(&profile.experience)
        .bind(profile.rate)
        .bind(&profile.timezone)
        .execute(&mut *tx)
        .await
        .map_err(|e| read_error(e, "create profile"))?;

        tx.commit()
            .await
            .map_err(|e| read_error(e, "commit registration"))?;

        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, is_mentor = $5, is_admin = $6,
                is_approved = $7, email_verified = $8, verification_token = $9,
                reset_token = $10, reset_token_expires_at = $11, last_login_at = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(user.id.value())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_mentor)
        .bind(user.is_admin)
        .bind(user.is_approved)
        .bind(user.email_verified)
        .bind(&user.verification_token)
        .bind(&user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "update user", || {
                "Email or username already in use".to_string()
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User {} not found", user.id)));
        }

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at DESC, id DESC", USER_COLUMNS);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list users"))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn admin_exists(&self) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE is_admin = TRUE)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error(e, "check for admin"))
    }

    async fn stats(&self) -> Result<UserStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE is_mentor AND NOT is_admin) AS total_mentors,
                COUNT(*) FILTER (WHERE NOT is_mentor AND NOT is_admin) AS total_mentees,
                COUNT(*) FILTER (WHERE is_mentor AND NOT is_admin AND NOT is_approved) AS pending_mentors,
                COUNT(*) FILTER (WHERE is_admin) AS admins
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error(e, "count users"))?;

        Ok(UserStats {
            total_users: row.get("total_users"),
            total_mentors: row.get("total_mentors"),
            total_mentees: row.get("total_mentees"),
            pending_mentors: row.get("pending_mentors"),
            admins: row.get("admins"),
        })
    }

    async fn record_login(&self, id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| read_error(e, "record login"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User {} not found", id)));
        }

        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    Ok(User {
        id: UserId::new(row.get("id"))?,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_mentor: row.get("is_mentor"),
        is_admin: row.get("is_admin"),
        is_approved: row.get("is_approved"),
        email_verified: row.get("email_verified"),
        verification_token: row.get("verification_token"),
        reset_token: row.get("reset_token"),
        reset_token_expires_at: row.get("reset_token_expires_at"),
        last_login_at: row.get("last_login_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
