// SPDX-License-Identifier: MIT

//! Firestore-backed implementation of [`RecordStore`].
//!
//! Document layout:
//! - `user_profiles/{user_id}` — one profile per user
//! - `fasting_sessions/{session_id}` — sessions, queried by `userId`

use async_trait::async_trait;

use crate::db::{collections, RecordStore, SessionCursor, SessionPage};
use crate::error::AppError;
use crate::models::{FastingSession, ProfileUpdate, UserProfile};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Sessions for a user filtered to a single status.
    async fn sessions_with_status(
        &self,
        user_id: &str,
        status: &'static str,
    ) -> Result<Vec<FastingSession>, AppError> {
        let user_id = user_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::FASTING_SESSIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("status").eq(status),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        // `insert` is a conditional create: it fails if the document
        // already exists, which enforces one-profile-per-user without
        // a read.
        let _: () = self
            .client
            .fluent()
            .insert()
            .into(collections::USER_PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| match e {
                firestore::errors::FirestoreError::DataConflictError(_) => {
                    AppError::Conflict("User profile already exists".to_string())
                }
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USER_PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError> {
        // Fetch-modify-write to preserve fields the update leaves out.
        let Some(mut profile) = self.get_profile(user_id).await? else {
            return Ok(None);
        };

        profile.apply_update(updates, chrono::Utc::now());

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USER_PROFILES)
            .document_id(user_id)
            .object(&profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(profile))
    }

    async fn create_session(&self, session: &FastingSession) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::FASTING_SESSIONS)
            .document_id(&session.session_id)
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<FastingSession>, AppError> {
        let session: Option<FastingSession> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::FASTING_SESSIONS)
            .obj()
            .one(session_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Ownership check: a session belonging to another user is
        // reported as absent, not forbidden.
        Ok(session.filter(|s| s.user_id == user_id))
    }

    async fn update_session(&self, session: &FastingSession) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::FASTING_SESSIONS)
            .document_id(&session.session_id)
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_active_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError> {
        self.sessions_with_status(user_id, "active").await
    }

    async fn completed_sessions(&self, user_id: &str) -> Result<Vec<FastingSession>, AppError> {
        self.sessions_with_status(user_id, "completed").await
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: u32,
        cursor: Option<SessionCursor>,
    ) -> Result<SessionPage, AppError> {
        let owner = user_id.to_string();

        let query = self
            .client
            .fluent()
            .select()
            .from(collections::FASTING_SESSIONS);

        let query = if let Some(cursor) = cursor {
            let start_time = cursor.start_time;
            let session_id = cursor.session_id;
            query.filter(move |q| {
                q.for_all([
                    q.field("userId").eq(owner.clone()),
                    // Strictly after the cursor in (startTime desc,
                    // sessionId desc) order
                    q.for_any([
                        q.field("startTime").less_than(start_time),
                        q.for_all([
                            q.field("startTime").eq(start_time),
                            q.field("sessionId").less_than(session_id.clone()),
                        ]),
                    ]),
                ])
            })
        } else {
            query.filter(move |q| q.field("userId").eq(owner.clone()))
        };

        // Fetch one extra item to determine if another page is available.
        let mut sessions: Vec<FastingSession> = query
            .order_by([
                (
                    "startTime",
                    firestore::FirestoreQueryDirection::Descending,
                ),
                (
                    "sessionId",
                    firestore::FirestoreQueryDirection::Descending,
                ),
            ])
            .limit(limit + 1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let has_more = sessions.len() > limit as usize;
        if has_more {
            sessions.truncate(limit as usize);
        }

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
