pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::workout::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/generate-workout",
            post(handlers::handle_generate_workout),
        )
        .route(
            "/api/v1/generate-workout/full",
            post(handlers::handle_generate_workout_full),
        )
        .route(
            "/api/v1/swap-exercise",
            post(handlers::handle_swap_exercise),
        )
        .with_state(state)
}
