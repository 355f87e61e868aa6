//! Optimistic exercise swap.
//!
//! The displayed line is replaced by a placeholder straight away; the server's
//! reply then either replaces it for good or the snapshot is put back.

use async_trait::async_trait;
use tracing::warn;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::plan::{exercise_name, DayBlock};

pub const SWAPPING_PLACEHOLDER: &str = "• Swapping...";

/// Anything that can produce a replacement exercise line.
#[async_trait]
pub trait ExerciseSwapper: Send + Sync {
    async fn swap(&self, exercise: &str, equipment: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl ExerciseSwapper for ApiClient {
    async fn swap(&self, exercise: &str, equipment: &str) -> Result<String, ClientError> {
        self.swap_exercise(exercise, equipment).await
    }
}

/// Swaps the exercise at (`day_index`, `position`) in place.
///
/// On failure the original line is restored and the error returned. Coordinates
/// that do not name an exercise are rejected before anything changes.
pub async fn swap_exercise_in_plan(
    plan: &mut [DayBlock],
    day_index: usize,
    position: usize,
    equipment: &str,
    swapper: &dyn ExerciseSwapper,
) -> Result<(), ClientError> {
    let exercise = plan
        .get_mut(day_index)
        .and_then(|day| day.exercises.get_mut(position))
        .ok_or_else(|| {
            ClientError::Validation(format!(
                "No exercise at day {day_index}, position {position}."
            ))
        })?;

    let snapshot = std::mem::replace(&mut exercise.text, SWAPPING_PLACEHOLDER.to_string());

    match swapper.swap(&exercise_name(&snapshot), equipment).await {
        Ok(replacement) => {
            exercise.text = replacement;
            Ok(())
        }
        Err(e) => {
            warn!("Failed to swap exercise: {e}");
            exercise.text = snapshot;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::plan::parse_plan;

    struct FixedSwapper {
        reply: Result<&'static str, &'static str>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FixedSwapper {
        fn new(reply: Result<&'static str, &'static str>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExerciseSwapper for FixedSwapper {
        async fn swap(&self, exercise: &str, equipment: &str) -> Result<String, ClientError> {
            self.calls
                .lock()
                .unwrap()
                .push((exercise.to_string(), equipment.to_string()));
            self.reply.map(str::to_string).map_err(|message| ClientError::Status {
                status: 500,
                message: message.to_string(),
            })
        }
    }

    fn sample_plan() -> Vec<DayBlock> {
        parse_plan(
            "Day 1:\n• Bench Press 4x8 – shoulder blades back\n• Push-up 3x10 – brace\n\
             Day 2:\n• Squat 4x6 – knees out",
        )
    }

    #[tokio::test]
    async fn test_swap_success_replaces_line_and_sends_clean_name() {
        let mut plan = sample_plan();
        let swapper = FixedSwapper::new(Ok("• Dumbbell Press 4x10 – control the descent"));

        swap_exercise_in_plan(&mut plan, 0, 0, "Dumbbells, Bench", &swapper)
            .await
            .unwrap();

        assert_eq!(
            plan[0].exercises[0].text,
            "• Dumbbell Press 4x10 – control the descent"
        );
        assert_eq!(plan[0].exercises[1].text, "• Push-up 3x10 – brace");
        assert_eq!(
            swapper.calls.lock().unwrap().as_slice(),
            &[("Bench Press 4x8".to_string(), "Dumbbells, Bench".to_string())]
        );
    }

    #[tokio::test]
    async fn test_swap_failure_restores_original_line() {
        let mut plan = sample_plan();
        let before = plan.clone();
        let swapper = FixedSwapper::new(Err("Failed to swap exercise."));

        let err = swap_exercise_in_plan(&mut plan, 1, 0, "Barbell", &swapper)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert_eq!(plan, before);
    }

    #[tokio::test]
    async fn test_swap_out_of_range_sends_nothing() {
        let mut plan = sample_plan();
        let swapper = FixedSwapper::new(Ok("• unused"));

        for (day, position) in [(2, 0), (1, 1)] {
            let err = swap_exercise_in_plan(&mut plan, day, position, "Barbell", &swapper)
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Validation(_)));
        }

        assert!(swapper.calls.lock().unwrap().is_empty());
        assert_eq!(plan, sample_plan());
    }
}
