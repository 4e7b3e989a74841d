//! Document store layer.
//!
//! [`RecordStore`] is the minimal capability set the handlers and the
//! session engine need: conditional create, get, partial update, and a
//! partition-ordered paged query. `FirestoreStore` is the production
//! implementation; `MemoryStore` backs tests and local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{FastingSession, ProfileUpdate, UserProfile};

/// Collection names as constants.
pub mod collections {
    pub const USER_PROFILES: &str = "user_profiles";
    pub const FASTING_SESSIONS: &str = "fasting_sessions";
}

/// Pagination key for session listing queries.
///
/// Identifies the last item of a page; the next page starts strictly
/// after it in (start_time desc, session_id desc) order. Encoded
/// opaquely for clients by the listing handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCursor {
    pub start_time: DateTime<Utc>,
    pub session_id: String,
}

/// One page of a session listing.
#[derive(Debug, Clone)]
pub struct SessionPage {
    pub sessions: Vec<FastingSession>,
    /// Present when more results exist beyond this page
    pub next_cursor: Option<SessionCursor>,
}

/// Store operations over user profiles and fasting sessions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a profile, failing with `Conflict` if one already exists
    /// for the user (conditional write, race-free).
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), AppError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;

    /// Apply a partial update, refreshing `updated_at`. Returns `None`
    /// if no profile exists for the user.
    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError>;

    async fn create_session(&self, session: &FastingSession) -> Result<(), AppError>;

    /// Get a session by id, scoped to its owning user. A session owned
    /// by a different user is reported as absent.
    async fn get_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<FastingSession>, AppError>;

    /// Persist an updated session (whole-document write).
    async fn update_session(&self, session: &FastingSession) -> Result<(), AppError>;

    /// All sessions for the user currently in `active` status.
    ///
    /// The one-active-session invariant makes more than one element a
    /// race aftermath; callers pick the first deterministically.
    async fn find_active_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError>;

    /// All sessions for the user in `completed` status.
    async fn completed_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError>;

    /// Sessions for the user ordered most-recent-first, at most `limit`
    /// items, starting strictly after `cursor` when present.
    async fn list_sessions(
        &self,
        user_id: &str,
        limit: u32,
        cursor: Option<SessionCursor>,
    ) -> Result<SessionPage, AppError>;
}
