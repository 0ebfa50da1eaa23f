//! Job board repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{
    ApplicationStatus, Job, JobApplication, JobStats, NewApplication, NewJob,
};
use crate::domain::id::{ApplicationId, JobId};
use crate::domain::DomainError;

#[async_trait]
pub trait JobRepository: Send + Sync + Debug {
    async fn create(&self, job: NewJob) -> Result<Job, DomainError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, DomainError>;

    /// Active listings, featured first then newest first
    async fn list_active(&self) -> Result<Vec<Job>, DomainError>;

    /// Every listing that is not closed, newest first
    async fn list_open_for_admin(&self) -> Result<Vec<Job>, DomainError>;

    async fn update(&self, job: &Job) -> Result<Job, DomainError>;

    async fn stats(&self) -> Result<JobStats, DomainError>;

    /// One application per user and job; repeats yield `DomainError::Conflict`
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, DomainError>;

    async fn get_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<JobApplication>, DomainError>;

    async fn list_applications(&self, job_id: JobId) -> Result<Vec<JobApplication>, DomainError>;

    async fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<JobApplication, DomainError>;
}
