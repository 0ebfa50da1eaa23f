//! Concurrent dashboard assembly
//!
//! Every section is fetched in its own task under a deadline. Results are
//! merged by key as they arrive; what a failure does depends on the
//! dashboard's [`FailurePolicy`].

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::source::DashboardSource;
use crate::domain::{
    Dashboard, DashboardKind, DashboardSection, DomainError, FailurePolicy, UserId,
};
use crate::infrastructure::observability::{
    record_dashboard_render, record_dashboard_section_failure,
};

/// Why a section produced no data
#[derive(Debug)]
enum SectionFailure {
    Error(DomainError),
    TimedOut,
    Panicked,
}

impl SectionFailure {
    fn reason(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::TimedOut => "timeout",
            Self::Panicked => "panic",
        }
    }

    fn into_error(self, section: DashboardSection) -> DomainError {
        match self {
            Self::Error(e) => e,
            Self::TimedOut => {
                DomainError::internal(format!("Dashboard section {} timed out", section))
            }
            Self::Panicked => {
                DomainError::internal(format!("Dashboard section {} failed unexpectedly", section))
            }
        }
    }
}

type SectionOutcome = (DashboardSection, Result<serde_json::Value, SectionFailure>);

#[derive(Debug)]
pub struct DashboardService {
    source: Arc<dyn DashboardSource>,
    section_timeout: Duration,
    mentee_policy: FailurePolicy,
    mentor_policy: FailurePolicy,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DashboardSource>, section_timeout: Duration) -> Self {
        Self {
            source,
            section_timeout,
            mentee_policy: DashboardKind::Mentee.default_policy(),
            mentor_policy: DashboardKind::Mentor.default_policy(),
        }
    }

    pub fn with_policy(mut self, kind: DashboardKind, policy: FailurePolicy) -> Self {
        match kind {
            DashboardKind::Mentee => self.mentee_policy = policy,
            DashboardKind::Mentor => self.mentor_policy = policy,
        }
        self
    }

    pub fn policy(&self, kind: DashboardKind) -> FailurePolicy {
        match kind {
            DashboardKind::Mentee => self.mentee_policy,
            DashboardKind::Mentor => self.mentor_policy,
        }
    }

    pub async fn render(
        &self,
        kind: DashboardKind,
        user_id: UserId,
    ) -> Result<Dashboard, DomainError> {
        let started = Instant::now();
        let policy = self.policy(kind);
        let requested = kind.sections();

        // Dropping the set on early return aborts the fetches still running
        let mut tasks = JoinSet::new();
        for &section in requested {
            tasks.spawn(fetch_section(
                Arc::clone(&self.source),
                user_id,
                section,
                self.section_timeout,
            ));
        }

        let mut sections = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (section, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(dashboard = %kind, error = %e, "Dashboard task failed to join");
                    if policy == FailurePolicy::FailFast {
                        record_dashboard_render(kind.as_str(), false, started.elapsed());
                        return Err(DomainError::internal(format!(
                            "Dashboard task failed: {}",
                            e
                        )));
                    }
                    continue;
                }
            };

            match outcome {
                Ok(value) => {
                    sections.insert(section, value);
                }
                Err(failure) => {
                    record_dashboard_section_failure(
                        kind.as_str(),
                        section.as_str(),
                        failure.reason(),
                    );
                    warn!(
                        dashboard = %kind,
                        section = %section,
                        reason = failure.reason(),
                        user_id = %user_id,
                        "Dashboard section failed"
                    );

                    if policy == FailurePolicy::FailFast {
                        record_dashboard_render(kind.as_str(), false, started.elapsed());
                        return Err(failure.into_error(section));
                    }
                }
            }
        }

        let omitted: Vec<DashboardSection> = requested
            .iter()
            .filter(|s| !sections.contains_key(*s))
            .copied()
            .collect();

        let dashboard = Dashboard {
            kind,
            sections,
            omitted,
        };

        record_dashboard_render(kind.as_str(), dashboard.is_complete(), started.elapsed());
        debug!(
            dashboard = %kind,
            user_id = %user_id,
            omitted = dashboard.omitted.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dashboard rendered"
        );

        Ok(dashboard)
    }
}

async fn fetch_section(
    source: Arc<dyn DashboardSource>,
    user_id: UserId,
    section: DashboardSection,
    deadline: Duration,
) -> SectionOutcome {
    let fetch = AssertUnwindSafe(source.fetch(user_id, section)).catch_unwind();

    let outcome = match tokio::time::timeout(deadline, fetch).await {
        Ok(Ok(result)) => result.map_err(SectionFailure::Error),
        Ok(Err(_)) => Err(SectionFailure::Panicked),
        Err(_) => Err(SectionFailure::TimedOut),
    };

    (section, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::infrastructure::dashboard::MockDashboardSource;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn user() -> UserId {
        UserId::new(3).unwrap()
    }

    fn mock_failing(failing: DashboardSection) -> MockDashboardSource {
        let mut source = MockDashboardSource::new();
        source.expect_fetch().returning(move |_, section| {
            if section == failing {
                Err(DomainError::storage("connection reset"))
            } else {
                Ok(json!({ "section": section.as_str() }))
            }
        });
        source
    }

    #[tokio::test]
    async fn test_all_sections_merged_by_key() {
        let service = DashboardService::new(
            Arc::new(mock_failing(DashboardSection::Analytics)),
            TIMEOUT,
        );

        let dashboard = service
            .render(DashboardKind::Mentee, user())
            .await
            .unwrap();

        assert!(dashboard.is_complete());
        assert_eq!(dashboard.sections.len(), 4);
        for section in DashboardKind::Mentee.sections() {
            assert_eq!(
                dashboard.section(*section),
                Some(&json!({ "section": section.as_str() }))
            );
        }
    }

    #[tokio::test]
    async fn test_mentee_dashboard_fails_on_any_section() {
        let service = DashboardService::new(
            Arc::new(mock_failing(DashboardSection::UpcomingSessions)),
            TIMEOUT,
        );

        let result = service.render(DashboardKind::Mentee, user()).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_mentor_dashboard_omits_failed_section() {
        let service = DashboardService::new(
            Arc::new(mock_failing(DashboardSection::PendingRequests)),
            TIMEOUT,
        );

        let dashboard = service
            .render(DashboardKind::Mentor, user())
            .await
            .unwrap();

        assert_eq!(dashboard.sections.len(), 4);
        assert_eq!(dashboard.omitted, vec![DashboardSection::PendingRequests]);
        assert!(dashboard.section(DashboardSection::PendingRequests).is_none());
        assert!(dashboard.section(DashboardSection::Analytics).is_some());
    }

    #[tokio::test]
    async fn test_policy_is_configurable_per_kind() {
        let service = DashboardService::new(
            Arc::new(mock_failing(DashboardSection::Analytics)),
            TIMEOUT,
        )
        .with_policy(DashboardKind::Mentor, FailurePolicy::FailFast);

        assert!(service.render(DashboardKind::Mentor, user()).await.is_err());
    }

    #[derive(Debug)]
    struct PanickingSource(DashboardSection);

    #[async_trait]
    impl DashboardSource for PanickingSource {
        async fn fetch(&self, _user_id: UserId, section: DashboardSection) -> Result<Value, DomainError> {
            if section == self.0 {
                panic!("section exploded");
            }
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_panicking_section_counts_as_failure() {
        let service = DashboardService::new(
            Arc::new(PanickingSource(DashboardSection::Programs)),
            TIMEOUT,
        );

        let dashboard = service
            .render(DashboardKind::Mentor, user())
            .await
            .unwrap();
        assert_eq!(dashboard.omitted, vec![DashboardSection::Programs]);

        let strict = DashboardService::new(
            Arc::new(PanickingSource(DashboardSection::Profile)),
            TIMEOUT,
        );
        assert!(strict.render(DashboardKind::Mentee, user()).await.is_err());
    }

    /// Sleeps on one section; counts fetches that ran to completion
    #[derive(Debug)]
    struct SlowSource {
        slow: DashboardSection,
        delay: Duration,
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DashboardSource for SlowSource {
        async fn fetch(&self, _user_id: UserId, section: DashboardSection) -> Result<Value, DomainError> {
            if section == self.slow {
                tokio::time::sleep(self.delay).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(json!(section.as_str()))
        }
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let finished = Arc::new(AtomicUsize::new(0));
        let source = SlowSource {
            slow: DashboardSection::Analytics,
            delay: Duration::from_secs(30),
            finished: finished.clone(),
        };
        let service = DashboardService::new(Arc::new(source), Duration::from_millis(50));

        let dashboard = service
            .render(DashboardKind::Mentor, user())
            .await
            .unwrap();

        assert_eq!(dashboard.omitted, vec![DashboardSection::Analytics]);
        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_mentee_timeout_fails_dashboard() {
        let source = SlowSource {
            slow: DashboardSection::RecommendedMentors,
            delay: Duration::from_secs(30),
            finished: Arc::new(AtomicUsize::new(0)),
        };
        let service = DashboardService::new(Arc::new(source), Duration::from_millis(50));

        let result = service.render(DashboardKind::Mentee, user()).await;
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    /// One section fails at once; the rest sleep, then count completions
    #[derive(Debug)]
    struct FailFirstSource {
        failing: DashboardSection,
        delay: Duration,
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DashboardSource for FailFirstSource {
        async fn fetch(&self, _user_id: UserId, section: DashboardSection) -> Result<Value, DomainError> {
            if section == self.failing {
                return Err(DomainError::storage("connection reset"));
            }
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(json!(section.as_str()))
        }
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_in_flight_sections() {
        let finished = Arc::new(AtomicUsize::new(0));
        let delay = Duration::from_millis(150);
        let source = FailFirstSource {
            failing: DashboardSection::Profile,
            delay,
            finished: finished.clone(),
        };
        let service = DashboardService::new(Arc::new(source), Duration::from_secs(5));

        let started = Instant::now();
        let result = service.render(DashboardKind::Mentee, user()).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(started.elapsed() < delay);

        // Outlive the sleeps; aborted fetches never reach the counter
        tokio::time::sleep(delay * 2).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }
}
