//! Fasting session model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session lifecycle state.
///
/// `Completed` and `Cancelled` are terminal. `Cancelled` is reachable
/// in the data model but no handler currently drives the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

/// A single fasting session, keyed by `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingSession {
    pub session_id: String,
    /// Owning user
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Intended fast duration in hours, if the user set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_hours: Option<f64>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FastingSession {
    /// Create a new active session starting at `now`.
    pub fn start(user_id: &str, target_hours: Option<f64>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            start_time: now,
            end_time: None,
            target_hours,
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `Completed`, stamping the end time.
    ///
    /// Callers must check the session is active first; this only
    /// records the transition.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.end_time = Some(now);
        self.status = SessionStatus::Completed;
        self.updated_at = now;
    }

    /// Fasted duration in hours, when both timestamps are present.
    pub fn duration_hours(&self) -> Option<f64> {
        let end = self.end_time?;
        Some((end - self.start_time).num_milliseconds() as f64 / 3_600_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_start_is_active_with_matching_timestamps() {
        let now = Utc::now();
        let session = FastingSession::start("user-1", Some(16.0), now);

        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.start_time, now);
        assert_eq!(session.created_at, now);
        assert_eq!(session.updated_at, now);
        assert!(session.end_time.is_none());
    }

    #[test]
    fn test_sessions_get_unique_ids() {
        let now = Utc::now();
        let a = FastingSession::start("user-1", None, now);
        let b = FastingSession::start("user-1", None, now);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_complete_stamps_end_time() {
        let start = Utc::now();
        let mut session = FastingSession::start("user-1", None, start);
        let end = start + Duration::hours(5);

        session.complete(end);

        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.end_time, Some(end));
        assert_eq!(session.updated_at, end);
        assert!((session.duration_hours().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_requires_end_time() {
        let session = FastingSession::start("user-1", None, Utc::now());
        assert!(session.duration_hours().is_none());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(SessionStatus::Active).unwrap(),
            serde_json::json!("active")
        );
        assert_eq!(
            serde_json::to_value(SessionStatus::Cancelled).unwrap(),
            serde_json::json!("cancelled")
        );
    }
}
