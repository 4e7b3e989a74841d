//! Derived fasting statistics.
//!
//! Stats are never persisted; they are recomputed on demand from the
//! active session (if any), the completed-session history, and the
//! user profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{FastingSession, SessionStatus, UserProfile};

/// On-demand statistics for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingStats {
    pub is_currently_fasting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_session: Option<FastingSession>,
    /// Hours elapsed in the current fast (fractional, clamped at zero)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_since_started: Option<f64>,
    /// Hours left until the current fast's target, never negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    pub diseases: Vec<String>,
    pub total_fasting_hours: f64,
    pub completed_sessions: u32,
}

impl FastingStats {
    /// Compute stats from a user's profile and session history.
    ///
    /// `active` is the user's active session if one exists. Completed
    /// sessions missing either timestamp are excluded from both the
    /// total and the count rather than failing the computation.
    pub fn compute(
        profile: &UserProfile,
        active: Option<FastingSession>,
        completed: &[FastingSession],
        now: DateTime<Utc>,
    ) -> Self {
        let mut hours_since_started = None;
        let mut hours_remaining = None;

        if let Some(session) = &active {
            // Clock skew can put start_time slightly in the future;
            // clamp rather than report a negative elapsed time.
            let elapsed =
                ((now - session.start_time).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
            hours_since_started = Some(elapsed);

            if let Some(target) = session.target_hours {
                hours_remaining = Some((target - elapsed).max(0.0));
            }
        }

        let mut total_fasting_hours = 0.0;
        let mut completed_count = 0u32;
        for session in completed {
            if session.status != SessionStatus::Completed {
                continue;
            }
            if let Some(hours) = session.duration_hours() {
                total_fasting_hours += hours;
                completed_count += 1;
            }
        }

        Self {
            is_currently_fasting: active.is_some(),
            current_session: active,
            hours_since_started,
            hours_remaining,
            target_weight: profile.target_weight,
            diseases: profile.diseases.clone(),
            total_fasting_hours,
            completed_sessions: completed_count,
        }
    }
}
