// SPDX-License-Identifier: MIT

//! API response envelope shared by all handlers.

use axum::Json;
use serde::Serialize;

/// Envelope wrapping every API response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        })
    }

    /// Successful response carrying `data` and a human-readable message.
    pub fn success_with_message(data: T, message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.to_string()),
        })
    }

    /// Failure response. `data` carries structured detail when present
    /// (e.g. per-field validation errors).
    pub fn failure(error: &str, data: Option<T>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.to_string()),
            message: None,
        }
    }
}
