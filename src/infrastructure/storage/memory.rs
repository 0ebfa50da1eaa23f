//! In-memory tables shared by the in-memory repositories
//!
//! All repositories built over the same [`MemoryDatabase`] see the same data,
//! and a single write lock makes multi-table writes atomic.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::job::{Job, JobApplication};
use crate::domain::mentorship::{
    AvailabilitySlot, MentorshipProgram, MentorshipRequest, MentorshipSession, SessionFeedback,
};
use crate::domain::profile::Profile;
use crate::domain::user::User;
use crate::domain::UserId;

/// Table contents. Keys are raw ids so iteration follows insertion order.
#[derive(Debug, Default)]
pub struct MemoryTables {
    pub users: BTreeMap<i64, User>,
    pub profiles: BTreeMap<i64, Profile>,
    pub programs: BTreeMap<i64, MentorshipProgram>,
    pub requests: BTreeMap<i64, MentorshipRequest>,
    pub sessions: BTreeMap<i64, MentorshipSession>,
    pub feedback: BTreeMap<i64, SessionFeedback>,
    pub availability: BTreeMap<UserId, Vec<AvailabilitySlot>>,
    pub jobs: BTreeMap<i64, Job>,
    pub applications: BTreeMap<i64, JobApplication>,
    sequence: i64,
}

impl MemoryTables {
    /// Next value of the shared id sequence
    pub fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    pub fn profile_by_user(&self, user_id: UserId) -> Option<&Profile> {
        self.profiles.values().find(|p| p.user_id == user_id)
    }

    /// Mentor id of the request a session belongs to, with its mentee
    pub fn session_participants(&self, session: &MentorshipSession) -> Option<(UserId, UserId)> {
        self.requests
            .get(&session.request_id.value())
            .map(|r| (r.mentor_id, r.mentee_id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, MemoryTables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, MemoryTables> {
        self.tables.write().await
    }
}
