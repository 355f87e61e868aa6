//! Request / response bodies for the workout API.
//!
//! Request fields default when absent so a missing field is reported as a
//! validation error with the usual `{"error": ...}` body.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 7;

/// Body of `POST /api/v1/generate-workout`. Multi-valued client selections
/// arrive comma-joined.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateWorkoutRequest {
    pub goal: String,
    pub equipment: String,
    pub days: Option<i64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub goal: String,
    pub equipment: String,
    pub days: u8,
}

impl GenerateWorkoutRequest {
    pub fn validate(self) -> Result<PlanRequest, AppError> {
        let goal = self.goal.trim();
        let equipment = self.equipment.trim();

        if goal.is_empty() {
            return Err(AppError::Validation("Goal is required.".to_string()));
        }
        if equipment.is_empty() {
            return Err(AppError::Validation("Equipment is required.".to_string()));
        }

        let days = match self.days {
            Some(d) if (MIN_DAYS..=MAX_DAYS).contains(&d) => d as u8,
            _ => {
                return Err(AppError::Validation(format!(
                    "Days must be between {MIN_DAYS} and {MAX_DAYS}."
                )))
            }
        };

        Ok(PlanRequest {
            goal: goal.to_string(),
            equipment: equipment.to_string(),
            days,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SwapExerciseRequest {
    pub exercise: String,
    pub equipment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapExerciseResponse {
    pub new_exercise: String,
}
