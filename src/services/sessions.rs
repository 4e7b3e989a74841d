// SPDX-License-Identifier: MIT

//! Session lifecycle engine.
//!
//! Owns the state-transition rules and derived-statistics computation
//! for fasting sessions; all session mutation goes through here.

use chrono::Utc;
use std::sync::Arc;

use crate::db::{RecordStore, SessionCursor, SessionPage};
use crate::error::AppError;
use crate::models::{FastingSession, FastingStats, SessionStatus, UserProfile};

/// Hard cap on the listing page size.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Session lifecycle engine.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn RecordStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Start a new fast for the user.
    ///
    /// The caller has already verified the user's profile exists. This
    /// enforces the one-active-session invariant with a read-before-
    /// write check: concurrent starts can still slip past it (the
    /// store has no compare-and-swap guard here).
    pub async fn start_fast(
        &self,
        user_id: &str,
        target_hours: Option<f64>,
    ) -> Result<FastingSession, AppError> {
        let active = self.store.find_active_sessions(user_id).await?;
        if !active.is_empty() {
            return Err(AppError::Conflict("User is already fasting".to_string()));
        }

        let session = FastingSession::start(user_id, target_hours, Utc::now());
        self.store.create_session(&session).await?;

        tracing::info!(
            user_id,
            session_id = %session.session_id,
            target_hours = ?target_hours,
            "Fasting session started"
        );

        Ok(session)
    }

    /// End an active fast.
    ///
    /// Not idempotent: a second call on the same session fails because
    /// the session is no longer active.
    pub async fn end_fast(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<FastingSession, AppError> {
        let mut session = self
            .store
            .get_session(session_id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if session.status != SessionStatus::Active {
            return Err(AppError::InvalidState("Session is not active".to_string()));
        }

        session.complete(Utc::now());
        self.store.update_session(&session).await?;

        tracing::info!(
            user_id,
            session_id,
            hours = ?session.duration_hours(),
            "Fasting session completed"
        );

        Ok(session)
    }

    /// Compute on-demand statistics for the user.
    ///
    /// Pure read-and-compute; nothing is persisted.
    pub async fn stats(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<FastingStats, AppError> {
        let mut active = self.store.find_active_sessions(user_id).await?;

        // The invariant allows at most one active session. If a race
        // ever produced more, take the first rather than failing.
        if active.len() > 1 {
            tracing::warn!(
                user_id,
                count = active.len(),
                "Multiple active sessions found; using the first"
            );
        }
        let current = if active.is_empty() {
            None
        } else {
            Some(active.swap_remove(0))
        };

        let completed = self.store.completed_sessions(user_id).await?;

        Ok(FastingStats::compute(
            profile,
            current,
            &completed,
            Utc::now(),
        ))
    }

    /// List the user's sessions, most recent first.
    ///
    /// `limit` is validated upstream; clamped here as a backstop.
    pub async fn list(
        &self,
        user_id: &str,
        limit: u32,
        cursor: Option<SessionCursor>,
    ) -> Result<SessionPage, AppError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        self.store.list_sessions(user_id, limit, cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::FastingGoal;

    fn make_service() -> (SessionService, Arc<dyn RecordStore>) {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        (SessionService::new(store.clone()), store)
    }

    fn make_profile(user_id: &str) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            name: "Test User".to_string(),
            date_of_birth: None,
            current_weight: None,
            target_weight: None,
            diseases: vec![],
            fasting_goals: vec![FastingGoal::Detox],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_second_start_conflicts() {
        let (service, _) = make_service();

        service.start_fast("user-1", Some(16.0)).await.unwrap();
        let err = service.start_fast("user-1", None).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_start_allowed_after_ending() {
        let (service, _) = make_service();

        let first = service.start_fast("user-1", None).await.unwrap();
        service
            .end_fast(&first.session_id, "user-1")
            .await
            .unwrap();

        // No active session left, so a new fast may begin
        service.start_fast("user-1", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_end_fast_is_not_idempotent() {
        let (service, _) = make_service();

        let session = service.start_fast("user-1", None).await.unwrap();

        let ended = service
            .end_fast(&session.session_id, "user-1")
            .await
            .unwrap();
        assert_eq!(ended.status, SessionStatus::Completed);
        assert!(ended.end_time.is_some());

        let err = service
            .end_fast(&session.session_id, "user-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_end_unknown_session() {
        let (service, _) = make_service();
        let err = service.end_fast("missing", "user-1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_end_fast_scoped_to_owner() {
        let (service, _) = make_service();
        let session = service.start_fast("user-1", None).await.unwrap();

        let err = service
            .end_fast(&session.session_id, "user-2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_stats_with_no_sessions() {
        let (service, _) = make_service();
        let profile = make_profile("user-1");

        let stats = service.stats("user-1", &profile).await.unwrap();

        assert!(!stats.is_currently_fasting);
        assert_eq!(stats.total_fasting_hours, 0.0);
        assert_eq!(stats.completed_sessions, 0);
    }

    #[tokio::test]
    async fn test_stats_picks_one_active_session_under_race_aftermath() {
        let (service, store) = make_service();
        let profile = make_profile("user-1");

        // Two active sessions, as a lost race would leave behind
        let now = Utc::now();
        store
            .create_session(&FastingSession::start("user-1", None, now))
            .await
            .unwrap();
        store
            .create_session(&FastingSession::start("user-1", Some(16.0), now))
            .await
            .unwrap();

        let stats = service.stats("user-1", &profile).await.unwrap();
        assert!(stats.is_currently_fasting);
        assert!(stats.current_session.is_some());
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let (service, _) = make_service();
        service.start_fast("user-1", None).await.unwrap();

        // Limit zero would be rejected upstream; the engine clamps
        let page = service.list("user-1", 0, None).await.unwrap();
        assert_eq!(page.sessions.len(), 1);
    }
}
