//! Job board entities

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::{ApplicationId, JobId, UserId};
use crate::domain::user::validate_email;
use crate::domain::DomainError;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DomainError::validation(format!(
                        "Unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

text_enum!(JobType {
    FullTime => "full-time",
    PartTime => "part-time",
    Contract => "contract",
});

text_enum!(ExperienceLevel {
    Entry => "entry",
    Mid => "mid",
    Senior => "senior",
});

text_enum!(RemotePolicy {
    Remote => "remote",
    Hybrid => "hybrid",
    OnSite => "on-site",
});

text_enum!(
    /// Listing state. Only active jobs are shown publicly and accept applications.
    JobStatus {
        Active => "active",
        Expired => "expired",
        Closed => "closed",
    }
);

text_enum!(
    /// Review state of an application
    ///
    /// ```text
    /// pending  -> reviewed | accepted | rejected
    /// reviewed -> accepted | rejected
    /// ```
    ApplicationStatus {
        Pending => "pending",
        Reviewed => "reviewed",
        Accepted => "accepted",
        Rejected => "rejected",
    }
);

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        match (self, target) {
            (Self::Pending, Self::Reviewed | Self::Accepted | Self::Rejected) => true,
            (Self::Reviewed, Self::Accepted | Self::Rejected) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub remote_policy: RemotePolicy,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub contact_email: String,
    pub status: JobStatus,
    pub is_featured: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn close(&mut self) {
        self.status = JobStatus::Closed;
        self.updated_at = Utc::now();
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.is_featured = featured;
        self.updated_at = Utc::now();
    }
}

/// Posting submitted by an admin
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub salary_range: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub remote_policy: RemotePolicy,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if self.company.trim().is_empty() {
            return Err(DomainError::validation("company is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        if !self.contact_email.is_empty() {
            validate_email(&self.contact_email, None)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub draft: JobDraft,
    pub created_by: UserId,
}

impl NewJob {
    pub fn into_job(self, id: JobId) -> Job {
        let now = Utc::now();
        let draft = self.draft;

        Job {
            id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            description: draft.description,
            requirements: draft.requirements,
            salary_range: draft.salary_range,
            job_type: draft.job_type,
            experience_level: draft.experience_level,
            remote_policy: draft.remote_policy,
            contact_email: draft.contact_email,
            status: JobStatus::Active,
            is_featured: draft.is_featured,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub resume_url: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: JobId,
    pub user_id: UserId,
    pub cover_letter: String,
    pub resume_url: String,
}

impl NewApplication {
    pub fn into_application(self, id: ApplicationId) -> JobApplication {
        let now = Utc::now();

        JobApplication {
            id,
            job_id: self.job_id,
            user_id: self.user_id,
            status: ApplicationStatus::Pending,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            applied_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub active_jobs: i64,
    pub featured_jobs: i64,
    pub pending_applications: i64,
}
