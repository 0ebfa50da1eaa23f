//! Closed status types for the mentorship lifecycle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Lifecycle of a mentor's program offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    #[default]
    Active,
    Closed,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

/// Status of a mentee's request to join a program
///
/// ```text
/// pending  -> approved | rejected | cancelled
/// approved -> completed | cancelled
/// ```
/// A mentor may re-issue a decision while the request is still undecided or
/// decided (see [`RequestStatus::accepts_response`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    /// Check if this status can transition to another status
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        match (self, target) {
            (Self::Pending, Self::Approved) => true,
            (Self::Pending, Self::Rejected) => true,
            (Self::Pending, Self::Cancelled) => true,

            (Self::Approved, Self::Completed) => true,
            (Self::Approved, Self::Cancelled) => true,

            _ => false,
        }
    }

    /// Whether a mentor's approve/reject decision may be (re)applied.
    ///
    /// Decisions overwrite each other; completed or cancelled requests are closed.
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::Rejected)
    }

    pub fn from_decision(approve: bool) -> Self {
        if approve {
            Self::Approved
        } else {
            Self::Rejected
        }
    }
}

/// Status of a scheduled meeting
///
/// ```text
/// scheduled -> completed | cancelled | no_show
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scheduled)
    }

    pub fn can_transition_to(&self, target: SessionStatus) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::Completed)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::Scheduled, Self::NoShow)
        )
    }
}

macro_rules! status_text {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(DomainError::validation(format!(
                    "Unknown {} '{}'",
                    stringify!($ty),
                    s
                )))
            }
        }
    };
}

status_text!(ProgramStatus { Active, Closed });
status_text!(RequestStatus { Pending, Approved, Rejected, Completed, Cancelled });
status_text!(SessionStatus { Scheduled, Completed, Cancelled, NoShow });

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST_STATES: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    #[test]
    fn test_request_transition_table() {
        let allowed = [
            (RequestStatus::Pending, RequestStatus::Approved),
            (RequestStatus::Pending, RequestStatus::Rejected),
            (RequestStatus::Pending, RequestStatus::Cancelled),
            (RequestStatus::Approved, RequestStatus::Completed),
            (RequestStatus::Approved, RequestStatus::Cancelled),
        ];

        for from in REQUEST_STATES {
            for to in REQUEST_STATES {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_request_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_response_is_overwritable_until_closed() {
        assert!(RequestStatus::Pending.accepts_response());
        assert!(RequestStatus::Approved.accepts_response());
        assert!(RequestStatus::Rejected.accepts_response());
        assert!(!RequestStatus::Completed.accepts_response());
        assert!(!RequestStatus::Cancelled.accepts_response());
    }

    #[test]
    fn test_session_transitions() {
        let s = SessionStatus::Scheduled;
        assert!(s.can_transition_to(SessionStatus::Completed));
        assert!(s.can_transition_to(SessionStatus::Cancelled));
        assert!(s.can_transition_to(SessionStatus::NoShow));
        assert!(!s.can_transition_to(SessionStatus::Scheduled));

        for terminal in [
            SessionStatus::Completed,
            SessionStatus::Cancelled,
            SessionStatus::NoShow,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(SessionStatus::Scheduled));
            assert!(!terminal.can_transition_to(SessionStatus::Completed));
        }
    }

    #[test]
    fn test_text_round_trip() {
        assert_eq!("no_show".parse::<SessionStatus>().unwrap(), SessionStatus::NoShow);
        assert_eq!(RequestStatus::Approved.to_string(), "approved");
        assert_eq!("closed".parse::<ProgramStatus>().unwrap(), ProgramStatus::Closed);
        assert!("archived".parse::<ProgramStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&SessionStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
    }
}
