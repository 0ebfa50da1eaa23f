//! Profile entity and its projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::{ProfileId, UserId};
use crate::domain::DomainError;

/// Marketplace-facing data attached 1:1 to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    /// Comma separated skill list
    pub skills: String,
    pub experience: String,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub rate: f64,
    pub available: bool,
    pub timezone: String,
    pub profile_picture: String,
    /// JSON-encoded [`NotificationSettings`]
    pub notification_preferences: String,
    pub privacy_settings: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Normalized skills: trimmed, lowercased, empty entries dropped
    pub fn skill_list(&self) -> Vec<String> {
        split_skills(&self.skills)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Apply a partial update. Only present fields change.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), DomainError> {
        if let Some(rate) = update.rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(DomainError::validation("rate must be a non-negative number"));
            }
            self.rate = rate;
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(experience) = update.experience {
            self.experience = experience;
        }
        if let Some(timezone) = update.timezone {
            self.timezone = timezone;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(picture) = update.profile_picture {
            self.profile_picture = picture;
        }
        if let Some(linkedin) = update.linkedin {
            self.linkedin = linkedin;
        }
        if let Some(github) = update.github {
            self.github = github;
        }
        if let Some(twitter) = update.twitter {
            self.twitter = twitter;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Stored preferences, falling back to defaults when unset or unreadable
    pub fn notification_settings(&self) -> NotificationSettings {
        serde_json::from_str(&self.notification_preferences).unwrap_or_default()
    }

    pub fn set_notification_settings(
        &mut self,
        settings: &NotificationSettings,
    ) -> Result<(), DomainError> {
        self.notification_preferences = serde_json::to_string(settings)
            .map_err(|e| DomainError::internal(format!("Failed to encode settings: {}", e)))?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn settings(&self) -> ProfileSettings {
        ProfileSettings {
            notification_preferences: self.notification_preferences.clone(),
            privacy_settings: self.privacy_settings.clone(),
        }
    }

    pub fn set_settings(&mut self, settings: ProfileSettings) {
        self.notification_preferences = settings.notification_preferences;
        self.privacy_settings = settings.privacy_settings;
        self.updated_at = Utc::now();
    }
}

pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Profile data captured at registration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub timezone: String,
}

impl NewProfile {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(DomainError::validation("rate must be a non-negative number"));
        }
        Ok(())
    }

    pub fn into_profile(self, id: ProfileId, user_id: UserId) -> Profile {
        let now = Utc::now();

        Profile {
            id,
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            skills: self.skills,
            experience: self.experience,
            linkedin: String::new(),
            github: String::new(),
            twitter: String::new(),
            rate: self.rate,
            available: true,
            timezone: self.timezone,
            profile_picture: String::new(),
            notification_preferences: String::new(),
            privacy_settings: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub timezone: Option<String>,
    pub rate: Option<f64>,
    pub available: Option<bool>,
    pub profile_picture: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub session_reminders: bool,
    pub message_notifications: bool,
    pub updates_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            session_reminders: true,
            message_notifications: true,
            updates_notifications: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub notification_preferences: String,
    pub privacy_settings: String,
}

/// What other users see of a profile
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub skills: String,
    pub rate: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_picture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

/// Approved mentor as listed in search results and recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorSummary {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub skills: String,
    pub rate: f64,
    pub timezone: String,
    pub available: bool,
}

/// Mentor search criteria; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorSearchFilter {
    /// Case-insensitive substring match on the skills column
    pub skills: Option<String>,
    pub rate_min: Option<f64>,
    pub rate_max: Option<f64>,
    pub timezone: Option<String>,
    pub available: Option<bool>,
}

impl MentorSearchFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let (Some(min), Some(max)) = (self.rate_min, self.rate_max) {
            if min > max {
                return Err(DomainError::validation("rate_min cannot exceed rate_max"));
            }
        }
        Ok(())
    }

    /// In-process evaluation of the filter, mirroring the SQL used by Postgres
    pub fn matches(&self, mentor: &MentorSummary) -> bool {
        if let Some(skills) = self.skills.as_deref().filter(|s| !s.is_empty()) {
            if !mentor.skills.to_lowercase().contains(&skills.to_lowercase()) {
                return false;
            }
        }
        if self.rate_min.is_some_and(|min| mentor.rate < min) {
            return false;
        }
        if self.rate_max.is_some_and(|max| mentor.rate > max) {
            return false;
        }
        if let Some(tz) = self.timezone.as_deref().filter(|s| !s.is_empty()) {
            if mentor.timezone != tz {
                return false;
            }
        }
        if self.available.is_some_and(|a| mentor.available != a) {
            return false;
        }
        true
    }
}
