//! Profile domain

mod entity;
mod repository;

pub use entity::{
    split_skills, MentorSearchFilter, MentorSummary, NewProfile, NotificationSettings, Profile,
    ProfileSettings, ProfileUpdate, PublicProfile,
};
pub use repository::ProfileRepository;
