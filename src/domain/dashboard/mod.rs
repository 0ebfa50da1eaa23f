//! Dashboard composition types
//!
//! A dashboard is a set of independently fetched sections. Each dashboard kind
//! carries its own [`FailurePolicy`] deciding what a failed section does to the
//! whole view.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which dashboard is being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    Mentee,
    Mentor,
}

impl DashboardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mentee => "mentee",
            Self::Mentor => "mentor",
        }
    }

    /// Sections fetched for this dashboard
    pub fn sections(&self) -> &'static [DashboardSection] {
        match self {
            Self::Mentee => &[
                DashboardSection::Profile,
                DashboardSection::ActiveMentorships,
                DashboardSection::UpcomingSessions,
                DashboardSection::RecommendedMentors,
            ],
            Self::Mentor => &[
                DashboardSection::Profile,
                DashboardSection::Programs,
                DashboardSection::UpcomingSessions,
                DashboardSection::PendingRequests,
                DashboardSection::Analytics,
            ],
        }
    }

    /// Mentees get a complete view or an error; mentors get whatever loaded.
    pub fn default_policy(&self) -> FailurePolicy {
        match self {
            Self::Mentee => FailurePolicy::FailFast,
            Self::Mentor => FailurePolicy::BestEffort,
        }
    }
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single failed section does to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failure fails the dashboard and cancels the remaining fetches
    FailFast,
    /// Failures are logged and the section is left out
    BestEffort,
}

/// Key of an independently fetched dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Profile,
    ActiveMentorships,
    UpcomingSessions,
    RecommendedMentors,
    Programs,
    PendingRequests,
    Analytics,
}

impl DashboardSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::ActiveMentorships => "active_mentorships",
            Self::UpcomingSessions => "upcoming_sessions",
            Self::RecommendedMentors => "recommended_mentors",
            Self::Programs => "programs",
            Self::PendingRequests => "pending_requests",
            Self::Analytics => "analytics",
        }
    }
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assembled dashboard, keyed by section
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub kind: DashboardKind,
    pub sections: BTreeMap<DashboardSection, Value>,
    /// Sections left out under [`FailurePolicy::BestEffort`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub omitted: Vec<DashboardSection>,
}

impl Dashboard {
    pub fn section(&self, key: DashboardSection) -> Option<&Value> {
        self.sections.get(&key)
    }

    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_counts() {
        assert_eq!(DashboardKind::Mentee.sections().len(), 4);
        assert_eq!(DashboardKind::Mentor.sections().len(), 5);
    }

    #[test]
    fn test_policies_are_asymmetric() {
        assert_eq!(DashboardKind::Mentee.default_policy(), FailurePolicy::FailFast);
        assert_eq!(DashboardKind::Mentor.default_policy(), FailurePolicy::BestEffort);
    }

    #[test]
    fn test_serializes_sections_by_key() {
        let mut sections = BTreeMap::new();
        sections.insert(DashboardSection::Analytics, serde_json::json!({"total": 1}));

        let dashboard = Dashboard {
            kind: DashboardKind::Mentor,
            sections,
            omitted: vec![DashboardSection::Programs],
        };

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["sections"]["analytics"]["total"], 1);
        assert_eq!(json["omitted"][0], "programs");
        assert!(!dashboard.is_complete());
    }
}
