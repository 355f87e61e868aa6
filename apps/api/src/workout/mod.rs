// Workout generation: plan streaming, single-shot plan, exercise swap.
// All generation calls go through the `TextGenerator` in app state.

pub mod handlers;
pub mod models;
pub mod prompts;
