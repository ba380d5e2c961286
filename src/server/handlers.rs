use super::types::{ApiError, HealthResponse, Operation, PredictionResponse, timestamp};
use crate::{
    Error,
    config::Environment,
    error::ValidationKind,
    oracle::{ChatRequest, ImageReadingRequest, Oracle},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub oracle: Oracle,
    pub environment: Environment,
}

impl AppState {
    fn fail(&self, operation: Operation, error: Error) -> ApiError {
        match error.validation_kind() {
            Some(kind) => warn!(?operation, code = kind.as_str(), "Rejected request: {}", error),
            None => error!(?operation, code = error.code(), "Request failed: {}", error),
        }

        ApiError {
            operation,
            error,
            expose_details: !self.environment.is_production(),
        }
    }
}

/// Turns an extractor failure into the same error contract as every other failure.
fn rejected_body(rejection: JsonRejection) -> Error {
    let kind = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationKind::PayloadTooLarge
    } else {
        ValidationKind::InvalidRequest
    };

    Error::Body {
        kind,
        reason: rejection.body_text(),
    }
}

#[instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn read_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageReadingRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    info!("Received image reading request");

    let Json(request) =
        payload.map_err(|r| state.fail(Operation::ImageReading, rejected_body(r)))?;

    match state.oracle.read_image(request).await {
        Ok(text) => {
            info!("Image reading completed");
            Ok(Json(PredictionResponse::new(text)))
        }
        Err(e) => Err(state.fail(Operation::ImageReading, e)),
    }
}

#[instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    info!("Received chat request");

    let Json(request) = payload.map_err(|r| state.fail(Operation::Chat, rejected_body(r)))?;

    match state.oracle.chat(request).await {
        Ok(text) => {
            info!("Chat response completed");
            Ok(Json(PredictionResponse::new(text)))
        }
        Err(e) => Err(state.fail(Operation::Chat, e)),
    }
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.as_str().to_string(),
        timestamp: timestamp(),
    })
}
