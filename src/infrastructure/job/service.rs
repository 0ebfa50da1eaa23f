//! Job board service

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::job::{
    ApplicationStatus, Job, JobApplication, JobDraft, JobRepository, JobStats, NewApplication,
    NewJob,
};
use crate::domain::{ApplicationId, DomainError, Identity, JobId};

/// Applicant-supplied part of an application
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationDraft {
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
}

/// Admin authorization is enforced by the HTTP layer before these are called.
#[derive(Debug)]
pub struct JobService {
    repository: Arc<dyn JobRepository>,
}

impl JobService {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_active_jobs(&self) -> Result<Vec<Job>, DomainError> {
        self.repository.list_active().await
    }

    pub async fn get_job(&self, id: JobId) -> Result<Job, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Job {} not found", id)))
    }

    pub async fn create_job(&self, admin: Identity, draft: JobDraft) -> Result<Job, DomainError> {
        draft.validate()?;

        let job = self
            .repository
            .create(NewJob {
                draft,
                created_by: admin.user_id(),
            })
            .await?;

        info!(job_id = %job.id, "Job posted");
        Ok(job)
    }

    pub async fn list_jobs_admin(&self) -> Result<Vec<Job>, DomainError> {
        self.repository.list_open_for_admin().await
    }

    /// Closing an already closed job is a no-op
    pub async fn close_job(&self, id: JobId) -> Result<Job, DomainError> {
        let mut job = self.get_job(id).await?;
        job.close();

        let job = self.repository.update(&job).await?;
        info!(job_id = %id, "Job closed");
        Ok(job)
    }

    pub async fn set_featured(&self, id: JobId, featured: bool) -> Result<Job, DomainError> {
        let mut job = self.get_job(id).await?;
        job.set_featured(featured);

        self.repository.update(&job).await
    }

    pub async fn apply(
        &self,
        identity: Identity,
        job_id: JobId,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, DomainError> {
        let job = self.get_job(job_id).await?;
        if !job.is_open() {
            return Err(DomainError::validation(format!(
                "Job {} is not accepting applications",
                job_id
            )));
        }

        let application = self
            .repository
            .create_application(NewApplication {
                job_id,
                user_id: identity.user_id(),
                cover_letter: draft.cover_letter,
                resume_url: draft.resume_url,
            })
            .await?;

        info!(job_id = %job_id, application_id = %application.id, "Application received");
        Ok(application)
    }

    pub async fn list_applications(&self, job_id: JobId) -> Result<Vec<JobApplication>, DomainError> {
        self.get_job(job_id).await?;
        self.repository.list_applications(job_id).await
    }

    pub async fn update_application_status(
        &self,
        id: ApplicationId,
        target: ApplicationStatus,
    ) -> Result<JobApplication, DomainError> {
        let application = self
            .repository
            .get_application(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Application {} not found", id)))?;

        if !application.status.can_transition_to(target) {
            return Err(DomainError::conflict(format!(
                "Cannot move application from {} to {}",
                application.status, target
            )));
        }

        self.repository.update_application_status(id, target).await
    }

    pub async fn stats(&self) -> Result<JobStats, DomainError> {
        self.repository.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::{ExperienceLevel, JobStatus, JobType, RemotePolicy};
    use crate::domain::UserId;
    use crate::infrastructure::job::InMemoryJobRepository;
    use crate::infrastructure::storage::MemoryDatabase;

    fn service() -> JobService {
        JobService::new(Arc::new(InMemoryJobRepository::new(MemoryDatabase::new())))
    }

    fn admin() -> Identity {
        Identity::new(UserId::new(1).unwrap())
    }

    fn draft(title: &str, featured: bool) -> JobDraft {
        JobDraft {
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "Ship things".into(),
            requirements: String::new(),
            salary_range: "60k-80k".into(),
            job_type: JobType::Contract,
            experience_level: ExperienceLevel::Senior,
            remote_policy: RemotePolicy::Remote,
            contact_email: "jobs@acme.test".into(),
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn test_listing_puts_featured_first() {
        let service = service();
        service.create_job(admin(), draft("first", false)).await.unwrap();
        service.create_job(admin(), draft("featured", true)).await.unwrap();
        service.create_job(admin(), draft("newest", false)).await.unwrap();

        let titles: Vec<String> = service
            .list_active_jobs()
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["featured", "newest", "first"]);
    }

    #[tokio::test]
    async fn test_closed_jobs_hidden_and_refuse_applications() {
        let service = service();
        let job = service.create_job(admin(), draft("gone", false)).await.unwrap();

        let closed = service.close_job(job.id).await.unwrap();
        assert_eq!(closed.status, JobStatus::Closed);
        assert!(service.list_active_jobs().await.unwrap().is_empty());
        assert!(service.list_jobs_admin().await.unwrap().is_empty());

        let applicant = Identity::new(UserId::new(5).unwrap());
        let result = service
            .apply(applicant, job.id, ApplicationDraft::default())
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_application_conflicts() {
        let service = service();
        let job = service.create_job(admin(), draft("role", false)).await.unwrap();
        let applicant = Identity::new(UserId::new(5).unwrap());

        service
            .apply(applicant, job.id, ApplicationDraft::default())
            .await
            .unwrap();
        let again = service
            .apply(applicant, job.id, ApplicationDraft::default())
            .await;
        assert!(matches!(again, Err(DomainError::Conflict { .. })));

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.active_jobs, 1);
        assert_eq!(stats.pending_applications, 1);
    }

    #[tokio::test]
    async fn test_application_review_transitions() {
        let service = service();
        let job = service.create_job(admin(), draft("role", false)).await.unwrap();
        let application = service
            .apply(
                Identity::new(UserId::new(5).unwrap()),
                job.id,
                ApplicationDraft {
                    cover_letter: "Hello".into(),
                    resume_url: String::new(),
                },
            )
            .await
            .unwrap();

        service
            .update_application_status(application.id, ApplicationStatus::Reviewed)
            .await
            .unwrap();
        let accepted = service
            .update_application_status(application.id, ApplicationStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, ApplicationStatus::Accepted);

        let reverted = service
            .update_application_status(application.id, ApplicationStatus::Pending)
            .await;
        assert!(matches!(reverted, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_invalid_draft_rejected() {
        let service = service();
        let mut bad = draft("", false);
        bad.title = " ".into();

        let result = service.create_job(admin(), bad).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
