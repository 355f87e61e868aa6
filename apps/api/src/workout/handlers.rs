//! Axum route handlers for the Workout API.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;
use crate::workout::models::{
    GenerateWorkoutRequest, PlanResponse, SwapExerciseRequest, SwapExerciseResponse,
};
use crate::workout::prompts::{plan_prompt, swap_prompt};

const GENERATE_FAILED: &str = "Failed to generate workout plan.";
const SWAP_FAILED: &str = "Failed to swap exercise.";

/// POST /api/v1/generate-workout
///
/// Streams the generated plan as raw text chunks (no SSE framing) in arrival order.
/// Failures before the first byte produce a 500 JSON body. A failure after that
/// aborts the body, which the client observes as a broken transfer.
pub async fn handle_generate_workout(
    State(state): State<AppState>,
    request: Result<Json<GenerateWorkoutRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = request?;
    let plan = request.validate()?;
    let prompt = plan_prompt(&plan.goal, &plan.equipment, plan.days);

    info!(days = plan.days, goal = %plan.goal, "Starting plan stream");

    let deltas = state.llm.stream(&prompt).await.map_err(|e| {
        error!("Plan stream failed to open: {e}");
        AppError::Llm(GENERATE_FAILED.to_string())
    })?;

    let body = deltas.map(|delta| {
        delta.map(bytes::Bytes::from).map_err(|e| {
            error!("Plan stream failed mid-response: {e}");
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })
    });

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// POST /api/v1/generate-workout/full
///
/// Single-shot variant: waits for the whole plan and returns it as `{"plan": ...}`.
pub async fn handle_generate_workout_full(
    State(state): State<AppState>,
    request: Result<Json<GenerateWorkoutRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, AppError> {
    let Json(request) = request?;
    let plan = request.validate()?;
    let prompt = plan_prompt(&plan.goal, &plan.equipment, plan.days);

    let text = state.llm.complete(&prompt).await.map_err(|e| {
        error!("Plan generation failed: {e}");
        AppError::Llm(GENERATE_FAILED.to_string())
    })?;

    Ok(Json(PlanResponse { plan: text }))
}

/// POST /api/v1/swap-exercise
///
/// Returns one replacement exercise line. The model's reply is trimmed but
/// otherwise passed through unchecked.
pub async fn handle_swap_exercise(
    State(state): State<AppState>,
    request: Result<Json<SwapExerciseRequest>, JsonRejection>,
) -> Result<Json<SwapExerciseResponse>, AppError> {
    let Json(request) = request?;
    let exercise = request.exercise.trim();
    let equipment = request.equipment.trim();

    if exercise.is_empty() || equipment.is_empty() {
        return Err(AppError::Validation(
            "Exercise and equipment are required.".to_string(),
        ));
    }

    let reply = state
        .llm
        .complete(&swap_prompt(exercise, equipment))
        .await
        .map_err(|e| {
            error!("Exercise swap failed: {e}");
            AppError::Llm(SWAP_FAILED.to_string())
        })?;

    Ok(Json(SwapExerciseResponse {
        new_exercise: reply.trim().to_string(),
    }))
}
