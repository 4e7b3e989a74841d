// SPDX-License-Identifier: MIT

//! Fasting Tracker: backend API for a fasting-tracking application.
//!
//! This crate provides seven authenticated operations over two record
//! types (user profile, fasting session) plus a derived statistics
//! computation. Session state transitions are owned by
//! [`services::SessionService`].

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod schemas;
pub mod services;

use config::Config;
use db::RecordStore;
use services::SessionService;
use std::sync::Arc;

/// Shared application state.
///
/// All components are constructed once at startup and injected here;
/// there is no ambient global state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionService,
}
