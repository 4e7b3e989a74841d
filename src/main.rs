// SPDX-License-Identifier: MIT

//! Fasting Tracker API Server
//!
//! Authenticated backend for a fasting-tracking application: user
//! onboarding and profile management, fasting session lifecycle, and
//! derived fasting statistics.

use fasting_tracker::{
    config::Config, db::FirestoreStore, services::SessionService, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Fasting Tracker API");

    // Initialize the document store
    let store = FirestoreStore::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");
    let store: Arc<dyn fasting_tracker::db::RecordStore> = Arc::new(store);

    // Session lifecycle engine
    let sessions = SessionService::new(store.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sessions,
    });

    // Build router
    let app = fasting_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fasting_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
