// SPDX-License-Identifier: MIT

//! Request validation schemas.
//!
//! Bodies are parsed in two stages: raw JSON into a loosely-typed
//! [`serde_json::Value`], then validated field by field into a typed
//! request struct. Failures accumulate as (field, message) pairs so a
//! single response can report every invalid field.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, FieldError};
use crate::models::{FastingGoal, ProfileUpdate};

/// Validated onboarding request.
#[derive(Debug, Clone)]
pub struct OnboardingRequest {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub current_weight: Option<f64>,
    pub diseases: Vec<String>,
    pub fasting_goals: Vec<FastingGoal>,
}

/// Validated start-fast request.
#[derive(Debug, Clone)]
pub struct StartFastRequest {
    pub target_hours: Option<f64>,
}

/// Validated end-fast request.
#[derive(Debug, Clone)]
pub struct EndFastRequest {
    pub session_id: String,
}

/// Default page size for session listings.
pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// Parse a raw request body into loosely-typed JSON.
///
/// An empty body is treated as an empty object so that requests with
/// only optional fields need no body at all.
pub fn parse_body(raw: &str) -> Result<Value, AppError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))
}

/// Validate an onboarding body.
pub fn onboarding(body: &Value) -> Result<OnboardingRequest, AppError> {
    let mut errors = Vec::new();

    let name = match body.get("name").and_then(Value::as_str) {
        Some(s) if s.is_empty() => {
            errors.push(FieldError::new("name", "Name is required"));
            String::new()
        }
        Some(s) if s.chars().count() > 100 => {
            errors.push(FieldError::new("name", "Name too long"));
            String::new()
        }
        Some(s) => s.to_string(),
        None => {
            errors.push(FieldError::new("name", "Name is required"));
            String::new()
        }
    };

    let date_of_birth = match body.get("dateOfBirth").and_then(Value::as_str) {
        Some(s) => parse_iso_date(s).unwrap_or_else(|| {
            errors.push(FieldError::new(
                "dateOfBirth",
                "Date must be in YYYY-MM-DD format",
            ));
            NaiveDate::default()
        }),
        None => {
            errors.push(FieldError::new(
                "dateOfBirth",
                "Date must be in YYYY-MM-DD format",
            ));
            NaiveDate::default()
        }
    };

    let current_weight = optional_positive_number(body, "currentWeight", &mut errors);
    let diseases = optional_string_array(body, "diseases", &mut errors).unwrap_or_default();

    let fasting_goals = fasting_goals(body, &mut errors);

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(OnboardingRequest {
        name,
        date_of_birth,
        current_weight,
        diseases,
        fasting_goals,
    })
}

/// Validate an update-profile body into a partial update.
pub fn update_profile(body: &Value) -> Result<ProfileUpdate, AppError> {
    let mut errors = Vec::new();

    let updates = ProfileUpdate {
        current_weight: optional_positive_number(body, "currentWeight", &mut errors),
        target_weight: optional_positive_number(body, "targetWeight", &mut errors),
        diseases: optional_string_array(body, "diseases", &mut errors),
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(updates)
}

/// Validate a start-fast body.
pub fn start_fast(body: &Value) -> Result<StartFastRequest, AppError> {
    let mut errors = Vec::new();

    let target_hours = optional_positive_number(body, "targetHours", &mut errors);

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(StartFastRequest { target_hours })
}

/// Validate an end-fast body.
pub fn end_fast(body: &Value) -> Result<EndFastRequest, AppError> {
    match body.get("sessionId").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(EndFastRequest {
            session_id: s.to_string(),
        }),
        _ => Err(AppError::Validation(vec![FieldError::new(
            "sessionId",
            "Session ID is required",
        )])),
    }
}

/// Validate the `limit` query parameter for session listings.
pub fn list_limit(raw: Option<&str>) -> Result<u32, AppError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LIST_LIMIT);
    };

    let limit: u32 = raw.parse().map_err(|_| {
        AppError::Validation(vec![FieldError::new(
            "limit",
            "Limit must be a positive integer",
        )])
    })?;

    if limit == 0 {
        return Err(AppError::Validation(vec![FieldError::new(
            "limit",
            "Limit must be a positive integer",
        )]));
    }
    if limit > 100 {
        return Err(AppError::Validation(vec![FieldError::new(
            "limit",
            "Limit must be at most 100",
        )]));
    }

    Ok(limit)
}

// ─── Field helpers ───────────────────────────────────────────

/// Strict YYYY-MM-DD: fixed width, then a real calendar date.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn optional_positive_number(body: &Value, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v > 0.0 => Some(v),
            _ => {
                errors.push(FieldError::new(field, "Must be a positive number"));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(field, "Must be a positive number"));
            None
        }
    }
}

fn optional_string_array(
    body: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) => out.push(s.to_string()),
                    None => errors.push(FieldError::new(
                        format!("{}.{}", field, i),
                        "Must be a string",
                    )),
                }
            }
            Some(out)
        }
        Some(_) => {
            errors.push(FieldError::new(field, "Must be an array of strings"));
            None
        }
    }
}

fn fasting_goals(body: &Value, errors: &mut Vec<FieldError>) -> Vec<FastingGoal> {
    match body.get("fastingGoals") {
        Some(Value::Array(items)) if !items.is_empty() => {
            let mut goals = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match serde_json::from_value::<FastingGoal>(item.clone()) {
                    Ok(goal) => goals.push(goal),
                    Err(_) => errors.push(FieldError::new(
                        format!("fastingGoals.{}", i),
                        "Invalid fasting goal",
                    )),
                }
            }
            goals
        }
        _ => {
            errors.push(FieldError::new(
                "fastingGoals",
                "At least one fasting goal is required",
            ));
            Vec::new()
        }
    }
}
