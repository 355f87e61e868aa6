//! Plan request form state and the option pickers behind it.

use serde::Serialize;

use crate::error::ClientError;

pub const MIN_DAYS: u8 = 1;
pub const MAX_DAYS: u8 = 7;

/// Options shown in a picker at any one time.
pub const VISIBLE_OPTIONS_COUNT: usize = 15;

pub const GOAL_OPTIONS: [&str; 25] = [
    "Build Muscle",
    "Lose Weight",
    "Increase Strength",
    "Cardio Endurance",
    "Improve Flexibility",
    "Body Recomposition",
    "General Fitness",
    "Athletic Performance",
    "Hypertrophy",
    "Powerlifting",
    "Functional Fitness",
    "Core Strength",
    "Improve Posture",
    "Toning",
    "HIIT Training",
    "Yoga",
    "Pilates",
    "Circuit Training",
    "CrossFit",
    "Bodybuilding",
    "Weightlifting",
    "Calisthenics",
    "Plyometrics",
    "Agility Training",
    "Balance Training",
];

pub const EQUIPMENT_OPTIONS: [&str; 25] = [
    "Dumbbells",
    "Barbell",
    "Bodyweight",
    "Kettlebells",
    "Resistance Bands",
    "Squat Rack",
    "Bench",
    "Pull-up Bar",
    "Cable Machine",
    "Leg Press Machine",
    "Treadmill",
    "Stationary Bike",
    "Rowing Machine",
    "Medicine Ball",
    "None",
    "Yoga Mat",
    "Foam Roller",
    "Jump Rope",
    "StairMaster",
    "Elliptical Machine",
    "Smith Machine",
    "Dip Station",
    "Ab Wheel",
    "TRX Straps",
    "Hex Bar",
];

/// Which multi-valued field a selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Goal,
    Equipment,
}

/// User selections for one plan. `goal` and `equipment` behave as ordered sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub goal: Vec<String>,
    pub equipment: Vec<String>,
    pub days: u8,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            goal: vec!["Build Muscle".to_string()],
            equipment: vec!["Dumbbells".to_string(), "Bodyweight".to_string()],
            days: 3,
        }
    }
}

/// Wire body for the plan endpoints; multi-valued fields are comma-joined.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PlanPayload {
    pub goal: String,
    pub equipment: String,
    pub days: u8,
}

impl PlanRequest {
    /// An empty request, for callers that build selections from scratch.
    pub fn empty(days: u8) -> Self {
        Self {
            goal: Vec::new(),
            equipment: Vec::new(),
            days,
        }
    }

    fn values_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Goal => &mut self.goal,
            Field::Equipment => &mut self.equipment,
        }
    }

    /// Adds an option (picked or typed). Blank input and duplicates are ignored.
    pub fn select(&mut self, field: Field, option: &str) {
        let option = option.trim();
        if option.is_empty() {
            return;
        }
        let values = self.values_mut(field);
        if !values.iter().any(|v| v == option) {
            values.push(option.to_string());
        }
    }

    pub fn remove(&mut self, field: Field, option: &str) {
        self.values_mut(field).retain(|v| v != option);
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.goal.is_empty() {
            return Err(ClientError::Validation(
                "Pick at least one goal.".to_string(),
            ));
        }
        if self.equipment.is_empty() {
            return Err(ClientError::Validation(
                "Pick at least one piece of equipment.".to_string(),
            ));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.days) {
            return Err(ClientError::Validation(format!(
                "Days per week must be between {MIN_DAYS} and {MAX_DAYS}."
            )));
        }
        Ok(())
    }

    pub fn payload(&self) -> PlanPayload {
        PlanPayload {
            goal: self.goal.join(", "),
            equipment: self.equipment.join(", "),
            days: self.days,
        }
    }
}

/// The options a picker shows before any selection.
pub fn initial_visible(all_options: &[&str]) -> Vec<String> {
    all_options
        .iter()
        .take(VISIBLE_OPTIONS_COUNT)
        .map(|o| o.to_string())
        .collect()
}

/// Replaces a just-selected option in the visible list with the first catalog
/// option not currently shown. Selecting something that is not on show (a typed
/// custom option) leaves the list as it is. When every catalog option is already
/// shown, the list just loses the selected entry.
pub fn refill_pool(selected: &str, visible: &[String], all_options: &[&str]) -> Vec<String> {
    if !visible.iter().any(|v| v == selected) {
        return visible.to_vec();
    }

    let next = all_options
        .iter()
        .find(|option| !visible.iter().any(|v| v == *option));

    visible
        .iter()
        .filter(|v| v.as_str() != selected)
        .cloned()
        .chain(next.map(|o| o.to_string()))
        .collect()
}
