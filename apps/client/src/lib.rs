//! SmartReps client: turns a streamed, free-form workout plan into structured
//! day blocks as it arrives, and talks to the SmartReps API.

pub mod api;
pub mod error;
pub mod form;
pub mod plan;
pub mod stream;
pub mod swap;

pub use api::ApiClient;
pub use error::ClientError;
pub use form::PlanRequest;
pub use plan::{parse_plan, DayBlock, ExerciseLine};
pub use stream::{consume_plan_stream, PlanSession, PlanView};
