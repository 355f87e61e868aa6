//! HTTP client for the SmartReps API.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::form::PlanRequest;
use crate::plan::{parse_plan, DayBlock};
use crate::stream::consume_plan_stream;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Serialize)]
struct SwapRequest<'a> {
    exercise: &'a str,
    equipment: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    new_exercise: String,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    plan: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests a streamed plan, calling `on_update` with the reparsed plan after
    /// every chunk. Any failure, including one after the stream started, returns
    /// an error and no plan.
    pub async fn generate_plan<F>(
        &self,
        request: &PlanRequest,
        on_update: F,
    ) -> Result<Vec<DayBlock>, ClientError>
    where
        F: FnMut(&[DayBlock]),
    {
        request.validate()?;
        info!(days = request.days, "Requesting streamed plan");

        let response = self
            .client
            .post(self.url("/api/v1/generate-workout"))
            .json(&request.payload())
            .send()
            .await?;
        let response = ensure_success(response).await?;

        consume_plan_stream(response.bytes_stream(), on_update).await
    }

    /// Requests the whole plan in one response and parses it.
    pub async fn generate_plan_full(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<DayBlock>, ClientError> {
        request.validate()?;
        info!(days = request.days, "Requesting full plan");

        let response = self
            .client
            .post(self.url("/api/v1/generate-workout/full"))
            .json(&request.payload())
            .send()
            .await?;
        let body: PlanResponse = ensure_success(response).await?.json().await?;

        Ok(parse_plan(&body.plan))
    }

    /// Asks for one replacement line for `exercise`. Blank inputs are rejected
    /// without contacting the server.
    pub async fn swap_exercise(
        &self,
        exercise: &str,
        equipment: &str,
    ) -> Result<String, ClientError> {
        let exercise = exercise.trim();
        let equipment = equipment.trim();
        if exercise.is_empty() || equipment.is_empty() {
            return Err(ClientError::Validation(
                "Exercise and equipment are required.".to_string(),
            ));
        }

        debug!(exercise, "Requesting exercise swap");

        let response = self
            .client
            .post(self.url("/api/v1/swap-exercise"))
            .json(&SwapRequest {
                exercise,
                equipment,
            })
            .send()
            .await?;
        let body: SwapResponse = ensure_success(response).await?.json().await?;

        Ok(body.new_exercise)
    }
}

/// Turns a non-success status into `ClientError::Status`, preferring the
/// server's `{"error": ...}` message over the raw body.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: error_message(body),
    })
}

fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body)
}
