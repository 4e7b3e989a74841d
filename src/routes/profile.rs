// SPDX-License-Identifier: MIT

//! Profile handlers: onboarding, read, and partial update.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::response::ApiResponse;
use crate::schemas;
use crate::AppState;
use axum::{
    extract::State,
    routing::{post, put},
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/onboarding", post(onboarding))
        .route("/api/profile", put(update_profile).get(get_profile))
}

/// Create the user's profile (exactly once per user).
async fn onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let body = schemas::parse_body(&body)?;
    let request = schemas::onboarding(&body)?;

    // Pre-check for a friendlier conflict message; the store's
    // conditional create below is the race-free backstop.
    if state.store.get_profile(&user.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "User profile already exists".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let profile = UserProfile {
        user_id: user.user_id.clone(),
        email: user.email,
        name: request.name,
        date_of_birth: Some(request.date_of_birth),
        current_weight: request.current_weight,
        target_weight: None,
        diseases: request.diseases,
        fasting_goals: request.fasting_goals,
        created_at: now,
        updated_at: now,
    };

    state.store.create_profile(&profile).await?;

    tracing::info!(user_id = %user.user_id, "User profile created");

    Ok(ApiResponse::success_with_message(
        profile,
        "User profile created successfully",
    ))
}

/// Apply a partial update to the mutable profile fields.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let body = schemas::parse_body(&body)?;
    let updates = schemas::update_profile(&body)?;

    let profile = state
        .store
        .update_profile(&user.user_id, &updates)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::debug!(user_id = %user.user_id, "User profile updated");

    Ok(ApiResponse::success_with_message(
        profile,
        "Profile updated successfully",
    ))
}

/// Get the current user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let profile = state
        .store
        .get_profile(&user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(profile))
}
