//! PostgreSQL job board repository implementation

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::job::{
    ApplicationStatus, Job, JobApplication, JobRepository, JobStats, JobStatus, NewApplication,
    NewJob,
};
use crate::domain::{ApplicationId, DomainError, JobId, UserId};
use crate::infrastructure::storage::{map_write_error, read_error};

const JOB_COLUMNS: &str = r#"
    id, title, company, location, description, requirements, salary_range, job_type,
    experience_level, remote_policy, contact_email, status, is_featured, created_by,
    created_at, updated_at
"#;

const APPLICATION_COLUMNS: &str =
    "id, job_id, user_id, status, cover_letter, resume_url, applied_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_jobs(&self, sql: &str, action: &str) -> Result<Vec<Job>, DomainError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, action))?;

        rows.iter().map(row_to_job).collect()
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: NewJob) -> Result<Job, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO jobs (title, company, location, description, requirements, salary_range,
                              job_type, experience_level, remote_policy, contact_email, status,
                              is_featured, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let draft = &job.draft;
        let row = sqlx::query(&sql)
            .bind(&draft.title)
            .bind(&draft.company)
            .bind(&draft.location)
            .bind(&draft.description)
            .bind(&draft.requirements)
            .bind(&draft.salary_range)
            .bind(draft.job_type.as_str())
            .bind(draft.experience_level.as_str())
            .bind(draft.remote_policy.as_str())
            .bind(&draft.contact_email)
            .bind(JobStatus::Active.as_str())
            .bind(draft.is_featured)
            .bind(job.created_by.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "create job", || "Job already exists".to_string()))?;

        row_to_job(&row)
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, DomainError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get job"))?;

        row.as_ref().map(row_to_job).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Job>, DomainError> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE status = 'active' ORDER BY is_featured DESC, created_at DESC, id DESC",
            JOB_COLUMNS
        );
        self.fetch_jobs(&sql, "list jobs").await
    }

    async fn list_open_for_admin(&self) -> Result<Vec<Job>, DomainError> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE status <> 'closed' ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        );
        self.fetch_jobs(&sql, "list jobs").await
    }

    async fn update(&self, job: &Job) -> Result<Job, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $2, company = $3, location = $4, description = $5, requirements = $6,
                salary_range = $7, job_type = $8, experience_level = $9, remote_policy = $10,
                contact_email = $11, status = $12, is_featured = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(job.id.value())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.salary_range)
        .bind(job.job_type.as_str())
        .bind(job.experience_level.as_str())
        .bind(job.remote_policy.as_str())
        .bind(&job.contact_email)
        .bind(job.status.as_str())
        .bind(job.is_featured)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| read_error(e, "update job"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Job {} not found", job.id)));
        }

        Ok(job.clone())
    }

    async fn stats(&self) -> Result<JobStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM jobs WHERE status = 'active') AS active_jobs,
                (SELECT COUNT(*) FROM jobs WHERE status = 'active' AND is_featured) AS featured_jobs,
                (SELECT COUNT(*) FROM job_applications WHERE status = 'pending') AS pending_applications
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error(e, "get job stats"))?;

        Ok(JobStats {
            active_jobs: row.get("active_jobs"),
            featured_jobs: row.get("featured_jobs"),
            pending_applications: row.get("pending_applications"),
        })
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO job_applications (job_id, user_id, status, cover_letter, resume_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(application.job_id.value())
            .bind(application.user_id.value())
            .bind(ApplicationStatus::Pending.as_str())
            .bind(&application.cover_letter)
            .bind(&application.resume_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "create application", || {
                    format!(
                        "User {} already applied to job {}",
                        application.user_id, application.job_id
                    )
                })
            })?;

        row_to_application(&row)
    }

    async fn get_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<JobApplication>, DomainError> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE id = $1",
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get application"))?;

        row.as_ref().map(row_to_application).transpose()
    }

    async fn list_applications(&self, job_id: JobId) -> Result<Vec<JobApplication>, DomainError> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE job_id = $1 ORDER BY applied_at DESC, id DESC",
            APPLICATION_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(job_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list applications"))?;

        rows.iter().map(row_to_application).collect()
    }

    async fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<JobApplication, DomainError> {
        let sql = format!(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "update application"))?
            .ok_or_else(|| DomainError::not_found(format!("Application {} not found", id)))?;

        row_to_application(&row)
    }
}

fn row_to_job(row: &PgRow) -> Result<Job, DomainError> {
    let job_type: String = row.get("job_type");
    let experience_level: String = row.get("experience_level");
    let remote_policy: String = row.get("remote_policy");
    let status: String = row.get("status");

    Ok(Job {
        id: JobId::new(row.get("id"))?,
        title: row.get("title"),
        company: row.get("company"),
        location: row.get("location"),
        description: row.get("description"),
        requirements: row.get("requirements"),
        salary_range: row.get("salary_range"),
        job_type: job_type.parse()?,
        experience_level: experience_level.parse()?,
        remote_policy: remote_policy.parse()?,
        contact_email: row.get("contact_email"),
        status: status.parse()?,
        is_featured: row.get("is_featured"),
        created_by: UserId::new(row.get("created_by"))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_application(row: &PgRow) -> Result<JobApplication, DomainError> {
    let status: String = row.get("status");

    Ok(JobApplication {
        id: ApplicationId::new(row.get("id"))?,
        job_id: JobId::new(row.get("job_id"))?,
        user_id: UserId::new(row.get("user_id"))?,
        status: status.parse()?,
        cover_letter: row.get("cover_letter"),
        resume_url: row.get("resume_url"),
        applied_at: row.get("applied_at"),
        updated_at: row.get("updated_at"),
    })
}
