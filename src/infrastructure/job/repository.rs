//! In-memory job board repository

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::job::{
    ApplicationStatus, Job, JobApplication, JobRepository, JobStats, JobStatus, NewApplication,
    NewJob,
};
use crate::domain::{ApplicationId, DomainError, JobId};
use crate::infrastructure::storage::MemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryJobRepository {
    db: MemoryDatabase,
}

impl InMemoryJobRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: NewJob) -> Result<Job, DomainError> {
        let mut tables = self.db.write().await;

        let id = JobId::new(tables.next_id())?;
        let job = job.into_job(id);
        tables.jobs.insert(id.value(), job.clone());
        Ok(job)
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, DomainError> {
        Ok(self.db.read().await.jobs.get(&id.value()).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Job>, DomainError> {
        let tables = self.db.read().await;

        let mut jobs: Vec<Job> = tables
            .jobs
            .values()
            .rev()
            .filter(|j| j.status == JobStatus::Active)
            .cloned()
            .collect();

        // Stable sort keeps newest-first within each group
        jobs.sort_by_key(|j| !j.is_featured);
        Ok(jobs)
    }

    async fn list_open_for_admin(&self) -> Result<Vec<Job>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .jobs
            .values()
            .rev()
            .filter(|j| j.status != JobStatus::Closed)
            .cloned()
            .collect())
    }

    async fn update(&self, job: &Job) -> Result<Job, DomainError> {
        let mut tables = self.db.write().await;

        match tables.jobs.get_mut(&job.id.value()) {
            Some(stored) => {
                *stored = job.clone();
                Ok(job.clone())
            }
            None => Err(DomainError::not_found(format!("Job {} not found", job.id))),
        }
    }

    async fn stats(&self) -> Result<JobStats, DomainError> {
        let tables = self.db.read().await;

        let active = tables.jobs.values().filter(|j| j.is_open());
        Ok(JobStats {
            active_jobs: active.clone().count() as i64,
            featured_jobs: active.filter(|j| j.is_featured).count() as i64,
            pending_applications: tables
                .applications
                .values()
                .filter(|a| a.status == ApplicationStatus::Pending)
                .count() as i64,
        })
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, DomainError> {
        let mut tables = self.db.write().await;

        let duplicate = tables
            .applications
            .values()
            .any(|a| a.job_id == application.job_id && a.user_id == application.user_id);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "User {} already applied to job {}",
                application.user_id, application.job_id
            )));
        }

        let id = ApplicationId::new(tables.next_id())?;
        let application = application.into_application(id);
        tables.applications.insert(id.value(), application.clone());
        Ok(application)
    }

    async fn get_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<JobApplication>, DomainError> {
        Ok(self.db.read().await.applications.get(&id.value()).cloned())
    }

    async fn list_applications(&self, job_id: JobId) -> Result<Vec<JobApplication>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .applications
            .values()
            .rev()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<JobApplication, DomainError> {
        let mut tables = self.db.write().await;
        let application = tables
            .applications
            .get_mut(&id.value())
            .ok_or_else(|| DomainError::not_found(format!("Application {} not found", id)))?;

        application.status = status;
        application.updated_at = Utc::now();
        Ok(application.clone())
    }
}
