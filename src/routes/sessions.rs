// SPDX-License-Identifier: MIT

//! Session handlers: start/end a fast, derived stats, and the paged
//! session listing.

use crate::db::SessionCursor;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FastingSession, FastingStats};
use crate::response::ApiResponse;
use crate::schemas;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/fasts/start", post(start_fast))
        .route("/api/fasts/end", post(end_fast))
        .route("/api/stats", get(get_stats))
        .route("/api/sessions", get(list_sessions))
}

// ─── Start / End ─────────────────────────────────────────────

/// Start a new fasting session.
async fn start_fast(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ApiResponse<FastingSession>>> {
    // The engine requires an onboarded user
    if state.store.get_profile(&user.user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let body = schemas::parse_body(&body)?;
    let request = schemas::start_fast(&body)?;

    let session = state
        .sessions
        .start_fast(&user.user_id, request.target_hours)
        .await?;

    Ok(ApiResponse::success_with_message(
        session,
        "Fasting session started successfully",
    ))
}

/// End the session named in the body.
async fn end_fast(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ApiResponse<FastingSession>>> {
    let body = schemas::parse_body(&body)?;
    let request = schemas::end_fast(&body)?;

    let session = state
        .sessions
        .end_fast(&request.session_id, &user.user_id)
        .await?;

    Ok(ApiResponse::success_with_message(
        session,
        "Fasting session ended successfully",
    ))
}

// ─── Stats ───────────────────────────────────────────────────

/// Get derived fasting statistics for the current user.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<FastingStats>>> {
    let profile = state
        .store
        .get_profile(&user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let stats = state.sessions.stats(&user.user_id, &profile).await?;

    Ok(ApiResponse::success(stats))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListSessionsQuery {
    /// Items per page (1..=100, default 20)
    limit: Option<String>,
    /// Opaque continuation cursor from a previous page
    #[serde(rename = "nextToken")]
    next_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsResponse {
    pub sessions: Vec<FastingSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

fn parse_cursor(raw: Option<&str>) -> Result<Option<SessionCursor>> {
    raw.map(|raw| {
        let invalid_cursor =
            || AppError::BadRequest("Invalid 'nextToken' parameter".to_string());

        let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
        let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

        let mut parts = decoded_str.splitn(3, ':');
        let seconds = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid_cursor)?;
        let nanos = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid_cursor)?;
        let session_id = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid_cursor)?;
        let start_time =
            chrono::DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid_cursor)?;

        Ok(SessionCursor {
            start_time,
            session_id: session_id.to_string(),
        })
    })
    .transpose()
}

fn encode_cursor(cursor: &SessionCursor) -> String {
    let payload = format!(
        "{}:{}:{}",
        cursor.start_time.timestamp(),
        cursor.start_time.timestamp_subsec_nanos(),
        cursor.session_id
    );
    URL_SAFE_NO_PAD.encode(payload)
}

/// List the user's sessions, most recent first.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListSessionsQuery>,
) -> Result<Json<ApiResponse<ListSessionsResponse>>> {
    let limit = schemas::list_limit(params.limit.as_deref())?;
    let cursor = parse_cursor(params.next_token.as_deref())?;

    tracing::debug!(
        user_id = %user.user_id,
        limit,
        has_cursor = cursor.is_some(),
        "Listing fasting sessions"
    );

    let page = state.sessions.list(&user.user_id, limit, cursor).await?;

    Ok(ApiResponse::success(ListSessionsResponse {
        next_token: page.next_cursor.as_ref().map(encode_cursor),
        sessions: page.sessions,
    }))
}
