// SPDX-License-Identifier: MIT

//! Derived statistics API tests.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use fasting_tracker::db::RecordStore;
use fasting_tracker::models::FastingSession;
use tower::ServiceExt;

mod common;

async fn get_stats(app: &axum::Router, token: &str) -> axum::response::Response {
    app.clone()
        .oneshot(common::json_request("GET", "/api/stats", token, None))
        .await
        .unwrap()
}

/// Seed a completed session of the given length, ending `ended_hours_ago`.
async fn seed_completed(
    state: &fasting_tracker::AppState,
    user_id: &str,
    length_hours: i64,
    ended_hours_ago: i64,
) {
    let end = Utc::now() - Duration::hours(ended_hours_ago);
    let start = end - Duration::hours(length_hours);
    let mut session = FastingSession::start(user_id, None, start);
    session.complete(end);
    state.store.create_session(&session).await.unwrap();
}

#[tokio::test]
async fn test_stats_require_profile() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);

    let response = get_stats(&app, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_with_no_sessions() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);
    common::seed_profile(&state, "user-1").await;

    let response = get_stats(&app, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["isCurrentlyFasting"], serde_json::json!(false));
    assert_eq!(data["totalFastingHours"], serde_json::json!(0.0));
    assert_eq!(data["completedSessions"], serde_json::json!(0));
    assert!(data["currentSession"].is_null());
    assert!(data["hoursSinceStarted"].is_null());
    assert!(data["hoursRemaining"].is_null());
    // Profile pass-through
    assert_eq!(data["targetWeight"], serde_json::json!(75.0));
    assert_eq!(data["diseases"][0], serde_json::json!("diabetes"));
}

#[tokio::test]
async fn test_stats_sum_completed_sessions() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);
    common::seed_profile(&state, "user-1").await;

    seed_completed(&state, "user-1", 5, 48).await;
    seed_completed(&state, "user-1", 16, 24).await;
    // Another user's history must not leak in
    common::seed_profile(&state, "user-2").await;
    seed_completed(&state, "user-2", 100, 10).await;

    let response = get_stats(&app, &token).await;
    let body = common::body_json(response).await;
    let data = &body["data"];

    assert_eq!(data["completedSessions"], serde_json::json!(2));
    let total = data["totalFastingHours"].as_f64().unwrap();
    assert!((total - 21.0).abs() < 1e-6);
    assert_eq!(data["isCurrentlyFasting"], serde_json::json!(false));
}

#[tokio::test]
async fn test_stats_with_active_session() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);
    common::seed_profile(&state, "user-1").await;

    let started = Utc::now() - Duration::hours(3);
    let session = FastingSession::start("user-1", Some(16.0), started);
    state.store.create_session(&session).await.unwrap();

    let response = get_stats(&app, &token).await;
    let body = common::body_json(response).await;
    let data = &body["data"];

    assert_eq!(data["isCurrentlyFasting"], serde_json::json!(true));
    assert_eq!(
        data["currentSession"]["sessionId"],
        serde_json::json!(session.session_id)
    );

    let elapsed = data["hoursSinceStarted"].as_f64().unwrap();
    assert!((elapsed - 3.0).abs() < 0.05, "elapsed = {}", elapsed);

    let remaining = data["hoursRemaining"].as_f64().unwrap();
    assert!((remaining - 13.0).abs() < 0.05, "remaining = {}", remaining);
}

#[tokio::test]
async fn test_stats_hours_remaining_clamped_at_zero() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);
    common::seed_profile(&state, "user-1").await;

    // 20 hours into a 16-hour target
    let session = FastingSession::start("user-1", Some(16.0), Utc::now() - Duration::hours(20));
    state.store.create_session(&session).await.unwrap();

    let response = get_stats(&app, &token).await;
    let body = common::body_json(response).await;

    assert_eq!(body["data"]["hoursRemaining"], serde_json::json!(0.0));
}

#[tokio::test]
async fn test_stats_active_session_without_target_has_no_remaining() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state);
    common::seed_profile(&state, "user-1").await;

    let session = FastingSession::start("user-1", None, Utc::now() - Duration::hours(2));
    state.store.create_session(&session).await.unwrap();

    let response = get_stats(&app, &token).await;
    let body = common::body_json(response).await;

    assert!(body["data"]["hoursSinceStarted"].is_number());
    assert!(body["data"]["hoursRemaining"].is_null());
}
