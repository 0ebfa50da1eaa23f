//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::profile::{MentorSearchFilter, MentorSummary, Profile, ProfileRepository};
use crate::domain::{DomainError, ProfileId, UserId};
use crate::infrastructure::storage::read_error;

const PROFILE_COLUMNS: &str = r#"
    id, user_id, first_name, last_name, bio, skills, experience, linkedin, github, twitter,
    rate, available, timezone, profile_picture, notification_preferences, privacy_settings,
    created_at, updated_at
"#;

#[derive(Debug, Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, DomainError> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get profile"))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET first_name = $2, last_name = $3, bio = $4, skills = $5, experience = $6,
                linkedin = $7, github = $8, twitter = $9, rate = $10, available = $11,
                timezone = $12, profile_picture = $13, notification_preferences = $14,
                privacy_settings = $15, updated_at = $16
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id.value())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(&profile.experience)
        .bind(&profile.linkedin)
        .bind(&profile.github)
        .bind(&profile.twitter)
        .bind(profile.rate)
        .bind(profile.available)
        .bind(&profile.timezone)
        .bind(&profile.profile_picture)
        .bind(&profile.notification_preferences)
        .bind(&profile.privacy_settings)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| read_error(e, "update profile"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Profile for user {} not found",
                profile.user_id
            )));
        }

        Ok(profile.clone())
    }

    async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        let sql = format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC, id DESC",
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list profiles"))?;

        rows.iter().map(row_to_profile).collect()
    }

    async fn search_mentors(
        &self,
        filter: &MentorSearchFilter,
    ) -> Result<Vec<MentorSummary>, DomainError> {
        // NULL parameters disable their predicate
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.username, p.first_name, p.last_name, p.bio, p.skills,
                   p.rate, p.timezone, p.available
            FROM profiles p
            INNER JOIN users u ON p.user_id = u.id
            WHERE u.is_mentor = TRUE AND u.is_approved = TRUE AND u.is_admin = FALSE
              AND ($1::TEXT IS NULL OR p.skills ILIKE '%' || $1 || '%')
              AND ($2::DOUBLE PRECISION IS NULL OR p.rate >= $2)
              AND ($3::DOUBLE PRECISION IS NULL OR p.rate <= $3)
              AND ($4::TEXT IS NULL OR p.timezone = $4)
              AND ($5::BOOLEAN IS NULL OR p.available = $5)
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(filter.skills.as_deref().filter(|s| !s.is_empty()))
        .bind(filter.rate_min)
        .bind(filter.rate_max)
        .bind(filter.timezone.as_deref().filter(|s| !s.is_empty()))
        .bind(filter.available)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "search mentors"))?;

        rows.iter()
            .map(|row| {
                Ok(MentorSummary {
                    user_id: UserId::new(row.get("user_id"))?,
                    username: row.get("username"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    bio: row.get("bio"),
                    skills: row.get("skills"),
                    rate: row.get("rate"),
                    timezone: row.get("timezone"),
                    available: row.get("available"),
                })
            })
            .collect()
    }
}

fn row_to_profile(row: &PgRow) -> Result<Profile, DomainError> {
    Ok(Profile {
        id: ProfileId::new(row.get("id"))?,
        user_id: UserId::new(row.get("user_id"))?,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        bio: row.get("bio"),
        skills: row.get("skills"),
        experience: row.get("experience"),
        linkedin: row.get("linkedin"),
        github: row.get("github"),
        twitter: row.get("twitter"),
        rate: row.get("rate"),
        available: row.get("available"),
        timezone: row.get("timezone"),
        profile_picture: row.get("profile_picture"),
        notification_preferences: row.get("notification_preferences"),
        privacy_settings: row.get("privacy_settings"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
