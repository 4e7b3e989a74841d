//! User profile model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Why a user is fasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastingGoal {
    WeightLoss,
    Detox,
    MentalClarity,
    Religious,
    Other,
}

/// User profile stored in Firestore.
///
/// Created exactly once per user (the user id doubles as the document
/// ID), mutated only through [`ProfileUpdate`], never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Verified subject id from the identity provider (also document ID)
    pub user_id: String,
    /// Verified email from the identity provider
    pub email: String,
    /// Display name
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Current weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    /// Target weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    /// Disease/condition tags
    #[serde(default)]
    pub diseases: Vec<String>,
    /// Fasting goals (non-empty, validated at onboarding)
    #[serde(default)]
    pub fasting_goals: Vec<FastingGoal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update to the mutable profile fields.
///
/// Fields left as `None` are not touched; there is no way to clear a
/// field through an update.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub diseases: Option<Vec<String>>,
}

impl UserProfile {
    /// Apply a partial update, refreshing `updated_at`.
    pub fn apply_update(&mut self, updates: &ProfileUpdate, now: DateTime<Utc>) {
        if let Some(weight) = updates.current_weight {
            self.current_weight = Some(weight);
        }
        if let Some(weight) = updates.target_weight {
            self.target_weight = Some(weight);
        }
        if let Some(diseases) = &updates.diseases {
            self.diseases = diseases.clone();
        }
        self.updated_at = now;
    }
}
