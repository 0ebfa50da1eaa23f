//! PostgreSQL mentorship repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::mentorship::{
    AvailabilitySlot, MentorshipProgram, MentorshipRepository, MentorshipRequest,
    MentorshipSession, NewFeedback, NewProgram, NewRequest, RatingSummary, RequestStatus,
    SessionCounts, SessionDraft, SessionFeedback, SessionStatus,
};
use crate::domain::{DomainError, FeedbackId, ProgramId, RequestId, SessionId, UserId};
use crate::infrastructure::storage::{map_write_error, read_error};

const PROGRAM_COLUMNS: &str =
    "id, mentor_id, title, description, duration, price, max_mentees, status, created_at, updated_at";

const REQUEST_COLUMNS: &str =
    "id, mentee_id, program_id, mentor_id, message, status, created_at, updated_at";

const SESSION_COLUMNS: &str = r#"
    s.id, s.request_id, s.title, s.topic, s.start_time, s.end_time, s.notes, s.status,
    s.created_at, s.updated_at
"#;

#[derive(Debug, Clone)]
pub struct PostgresMentorshipRepository {
    pool: PgPool,
}

impl PostgresMentorshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorshipRepository for PostgresMentorshipRepository {
    async fn create_program(&self, program: NewProgram) -> Result<MentorshipProgram, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO mentorship_programs
                (mentor_id, title, description, duration, price, max_mentees, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROGRAM_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(program.mentor_id.value())
            .bind(&program.draft.title)
            .bind(&program.draft.description)
            .bind(&program.draft.duration)
            .bind(program.draft.price)
            .bind(program.draft.max_mentees)
            .bind(program.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "create program", || "Program already exists".to_string())
            })?;

        row_to_program(&row)
    }

    async fn get_program(&self, id: ProgramId) -> Result<Option<MentorshipProgram>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_programs WHERE id = $1",
            PROGRAM_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get program"))?;

        row.as_ref().map(row_to_program).transpose()
    }

    async fn list_programs_by_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipProgram>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_programs WHERE mentor_id = $1 ORDER BY created_at DESC, id DESC",
            PROGRAM_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(mentor_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list programs"))?;

        rows.iter().map(row_to_program).collect()
    }

    async fn list_active_programs(&self) -> Result<Vec<MentorshipProgram>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_programs WHERE status = 'active' ORDER BY created_at DESC, id DESC",
            PROGRAM_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list active programs"))?;

        rows.iter().map(row_to_program).collect()
    }

    async fn create_request(&self, request: NewRequest) -> Result<MentorshipRequest, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO mentorship_requests (mentee_id, program_id, mentor_id, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(request.mentee_id.value())
            .bind(request.program_id.value())
            .bind(request.mentor_id.value())
            .bind(&request.message)
            .bind(RequestStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "create request", || "Request already exists".to_string())
            })?;

        row_to_request(&row)
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<MentorshipRequest>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_requests WHERE id = $1",
            REQUEST_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get request"))?;

        row.as_ref().map(row_to_request).transpose()
    }

    async fn update_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<MentorshipRequest, DomainError> {
        let sql = format!(
            "UPDATE mentorship_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            REQUEST_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "update request status"))?
            .ok_or_else(|| DomainError::not_found(format!("Request {} not found", id)))?;

        row_to_request(&row)
    }

    async fn list_requests_by_mentee(
        &self,
        mentee_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_requests WHERE mentee_id = $1 ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(mentee_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list mentee requests"))?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_requests_by_mentor(
        &self,
        mentor_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM mentorship_requests
            WHERE mentor_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            REQUEST_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(mentor_id.value())
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list mentor requests"))?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_approved_requests_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM mentorship_requests
            WHERE status = 'approved' AND (mentor_id = $1 OR mentee_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
            REQUEST_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list active mentorships"))?;

        rows.iter().map(row_to_request).collect()
    }

    async fn create_session(
        &self,
        session: SessionDraft,
    ) -> Result<MentorshipSession, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO mentorship_sessions AS s
                (request_id, title, topic, start_time, end_time, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(session.request_id.value())
            .bind(&session.title)
            .bind(&session.topic)
            .bind(session.start_time)
            .bind(session.end_time)
            .bind(&session.notes)
            .bind(SessionStatus::Scheduled.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "create session", || "Session already exists".to_string())
            })?;

        row_to_session(&row)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<MentorshipSession>, DomainError> {
        let sql = format!(
            "SELECT {} FROM mentorship_sessions s WHERE s.id = $1",
            SESSION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "get session"))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn update_session_status(
        &self,
        id: SessionId,
        status: SessionStatus,
    ) -> Result<MentorshipSession, DomainError> {
        let sql = format!(
            r#"
            UPDATE mentorship_sessions AS s SET status = $2, updated_at = NOW()
            WHERE s.id = $1
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.value())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| read_error(e, "update session status"))?
            .ok_or_else(|| DomainError::not_found(format!("Session {} not found", id)))?;

        row_to_session(&row)
    }

    async fn list_upcoming_sessions(
        &self,
        user_id: UserId,
        after: DateTime<Utc>,
    ) -> Result<Vec<MentorshipSession>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM mentorship_sessions s
            INNER JOIN mentorship_requests r ON s.request_id = r.id
            WHERE s.status = 'scheduled' AND s.start_time > $2
              AND (r.mentor_id = $1 OR r.mentee_id = $1)
            ORDER BY s.start_time ASC
            "#,
            SESSION_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.value())
            .bind(after)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(e, "list upcoming sessions"))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn session_counts_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<SessionCounts, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE s.status = 'completed') AS completed
            FROM mentorship_sessions s
            INNER JOIN mentorship_requests r ON s.request_id = r.id
            WHERE r.mentor_id = $1
            "#,
        )
        .bind(mentor_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error(e, "count sessions"))?;

        Ok(SessionCounts {
            total: row.get("total"),
            completed: row.get("completed"),
        })
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<SessionFeedback, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO session_feedback (session_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(feedback.session_id.value())
        .bind(feedback.user_id.value())
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "create feedback", || "Feedback already exists".to_string())
        })?;

        row_to_feedback(&row)
    }

    async fn list_feedback(&self, session_id: SessionId) -> Result<Vec<SessionFeedback>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, user_id, rating, comment, created_at
            FROM session_feedback WHERE session_id = $1 ORDER BY id
            "#,
        )
        .bind(session_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "list feedback"))?;

        rows.iter().map(row_to_feedback).collect()
    }

    async fn rating_summary_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<RatingSummary, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT AVG(f.rating)::DOUBLE PRECISION AS average, COUNT(f.id) AS count
            FROM session_feedback f
            INNER JOIN mentorship_sessions s ON f.session_id = s.id
            INNER JOIN mentorship_requests r ON s.request_id = r.id
            WHERE r.mentor_id = $1 AND f.user_id <> $1
            "#,
        )
        .bind(mentor_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error(e, "summarize ratings"))?;

        Ok(RatingSummary {
            average: row.get("average"),
            count: row.get("count"),
        })
    }

    async fn replace_availability(
        &self,
        mentor_id: UserId,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| read_error(e, "begin transaction"))?;

        sqlx::query("DELETE FROM mentor_availability WHERE mentor_id = $1")
            .bind(mentor_id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| read_error(e, "clear availability"))?;

        for slot in &slots {
            sqlx::query(
                r#"
                INSERT INTO mentor_availability (mentor_id, day_of_week, start_time, end_time)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(mentor_id.value())
            .bind(slot.day_of_week)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .execute(&mut *tx)
            .await
            .map_err(|e| read_error(e, "insert availability"))?;
        }

        tx.commit()
            .await
            .map_err(|e| read_error(e, "commit availability"))?;

        Ok(slots)
    }

    async fn list_availability(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT day_of_week, start_time, end_time FROM mentor_availability
            WHERE mentor_id = $1 ORDER BY day_of_week, start_time
            "#,
        )
        .bind(mentor_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error(e, "list availability"))?;

        Ok(rows
            .iter()
            .map(|row| AvailabilitySlot {
                day_of_week: row.get("day_of_week"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
            })
            .collect())
    }
}

fn row_to_program(row: &PgRow) -> Result<MentorshipProgram, DomainError> {
    let status: String = row.get("status");

    Ok(MentorshipProgram {
        id: ProgramId::new(row.get("id"))?,
        mentor_id: UserId::new(row.get("mentor_id"))?,
        title: row.get("title"),
        description: row.get("description"),
        duration: row.get("duration"),
        price: row.get("price"),
        max_mentees: row.get("max_mentees"),
        status: status.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_request(row: &PgRow) -> Result<MentorshipRequest, DomainError> {
    let status: String = row.get("status");

    Ok(MentorshipRequest {
        id: RequestId::new(row.get("id"))?,
        mentee_id: UserId::new(row.get("mentee_id"))?,
        program_id: ProgramId::new(row.get("program_id"))?,
        mentor_id: UserId::new(row.get("mentor_id"))?,
        message: row.get("message"),
        status: status.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_session(row: &PgRow) -> Result<MentorshipSession, DomainError> {
    let status: String = row.get("status");

    Ok(MentorshipSession {
        id: SessionId::new(row.get("id"))?,
        request_id: RequestId::new(row.get("request_id"))?,
        title: row.get("title"),
        topic: row.get("topic"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        notes: row.get("notes"),
        status: status.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_feedback(row: &PgRow) -> Result<SessionFeedback, DomainError> {
    Ok(SessionFeedback {
        id: FeedbackId::new(row.get("id"))?,
        session_id: SessionId::new(row.get("session_id"))?,
        user_id: UserId::new(row.get("user_id"))?,
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    })
}
