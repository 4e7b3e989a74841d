//! In-memory implementation of [`RecordStore`].
//!
//! Backs tests and local development without a Firestore project.
//! Mirrors the production store's semantics: conditional profile
//! create, read-modify-write partial updates, and descending paged
//! session queries.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::db::{RecordStore, SessionCursor, SessionPage};
use crate::error::AppError;
use crate::models::{FastingSession, ProfileUpdate, SessionStatus, UserProfile};

/// In-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<String, UserProfile>,
    sessions: DashMap<String, FastingSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions_for_user(&self, user_id: &str) -> Vec<FastingSession> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

/// Ordering key for the listing query: (start_time desc, session_id desc).
fn is_after_cursor(session: &FastingSession, cursor: &SessionCursor) -> bool {
    session.start_time < cursor.start_time
        || (session.start_time == cursor.start_time && session.session_id < cursor.session_id)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        // Entry-based conditional insert, same contract as the
        // production store's conditional create.
        match self.profiles.entry(profile.user_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::Conflict(
                "User profile already exists".to_string(),
            )),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError> {
        let Some(mut entry) = self.profiles.get_mut(user_id) else {
            return Ok(None);
        };

        entry.value_mut().apply_update(updates, chrono::Utc::now());
        Ok(Some(entry.value().clone()))
    }

    async fn create_session(&self, session: &FastingSession) -> Result<(), AppError> {
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn get_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<FastingSession>, AppError> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .filter(|s| s.user_id == user_id))
    }

    async fn update_session(&self, session: &FastingSession) -> Result<(), AppError> {
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find_active_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError> {
        let mut active: Vec<FastingSession> = self
            .sessions_for_user(user_id)
            .into_iter()
            .filter(|s| s.status == SessionStatus::Active)
            .collect();
        // Deterministic order for the degraded multiple-actives case
        active.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(active)
    }

    async fn completed_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError> {
        Ok(self
            .sessions_for_user(user_id)
            .into_iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .collect())
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: u32,
        cursor: Option<SessionCursor>,
    ) -> Result<SessionPage, AppError> {
        let mut sessions = self.sessions_for_user(user_id);
        sessions.sort_by(|a, b| {
            b.start_time
                .cmp(&a.start_time)
                .then_with(|| b.session_id.cmp(&a.session_id))
        });

        if let Some(cursor) = cursor {
            sessions.retain(|s| is_after_cursor(s, &cursor));
        }

        let has_more = sessions.len() > limit as usize;
        sessions.truncate(limit as usize);

        let next_cursor = if has_more {
            sessions.last().map(|s| SessionCursor {
                start_time: s.start_time,
                session_id: s.session_id.clone(),
            })
        } else {
            None
        };

        Ok(SessionPage {
            sessions,
            next_cursor,
        })
    }
}
