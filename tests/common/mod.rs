// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{header, Request};
use chrono::Utc;
use fasting_tracker::config::Config;
use fasting_tracker::db::{MemoryStore, RecordStore};
use fasting_tracker::middleware::auth::create_token;
use fasting_tracker::models::{FastingGoal, UserProfile};
use fasting_tracker::routes::create_router;
use fasting_tracker::services::SessionService;
use fasting_tracker::AppState;
use std::sync::Arc;

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let sessions = SessionService::new(store.clone());

    let state = Arc::new(AppState {
        config,
        store,
        sessions,
    });

    (create_router(state.clone()), state)
}

/// Create a signed bearer token for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, state: &AppState) -> String {
    create_token(
        user_id,
        &format!("{}@example.com", user_id),
        &state.config.jwt_signing_key,
    )
    .expect("Failed to sign test token")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json");

    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as parsed JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}

/// A well-formed onboarding body.
#[allow(dead_code)]
pub fn onboarding_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Test User",
        "dateOfBirth": "1990-05-17",
        "currentWeight": 82.5,
        "diseases": ["diabetes"],
        "fastingGoals": ["weight_loss"]
    })
}

/// Seed a profile directly into the store, bypassing the handler.
#[allow(dead_code)]
pub async fn seed_profile(state: &AppState, user_id: &str) {
    let now = Utc::now();
    let profile = UserProfile {
        user_id: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        name: "Test User".to_string(),
        date_of_birth: None,
        current_weight: Some(80.0),
        target_weight: Some(75.0),
        diseases: vec!["diabetes".to_string()],
        fasting_goals: vec![FastingGoal::WeightLoss],
        created_at: now,
        updated_at: now,
    };
    state
        .store
        .create_profile(&profile)
        .await
        .expect("Failed to seed profile");
}
