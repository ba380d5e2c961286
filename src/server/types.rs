use crate::{Error, error::ValidationKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
}

impl PredictionResponse {
    pub fn new(response: String) -> Self {
        Self {
            success: true,
            response,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub solution: String,
    pub code: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ImageReading,
    Chat,
}

/// A failed request on its way out to the caller.
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub error: Error,
    pub expose_details: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match (&self.error, self.error.validation_kind()) {
            (_, Some(ValidationKind::PayloadTooLarge)) => StatusCode::PAYLOAD_TOO_LARGE,
            (_, Some(_)) => StatusCode::BAD_REQUEST,
            (Error::Upstream { .. } | Error::EmptyResponse, None) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> (&'static str, &'static str) {
        match (self.error.validation_kind(), &self.error, self.operation) {
            (Some(ValidationKind::InvalidImageFormat), _, _) => (
                "Geçersiz resim formatı",
                "Lütfen geçerli bir base64 kodlanmış PNG/JPEG resmi sağlayın",
            ),
            (Some(ValidationKind::MissingMessage), _, _) => (
                "Geçersiz istek: Mesaj gerekli",
                "Lütfen falcıya sormak istediğiniz mesajı yazın",
            ),
            (Some(ValidationKind::InvalidRequest), _, _) => (
                "Geçersiz istek gövdesi",
                "Lütfen isteği geçerli bir JSON gövdesi olarak gönderin",
            ),
            (Some(ValidationKind::PayloadTooLarge), _, _) => (
                "İstek çok büyük",
                "Lütfen daha küçük bir resim gönderin",
            ),
            (None, Error::Upstream { .. } | Error::EmptyResponse, Operation::ImageReading) => (
                "Fal sunucusunda geçici sorun",
                "Lütfen 1 dakika sonra tekrar deneyin",
            ),
            (None, Error::Upstream { .. } | Error::EmptyResponse, Operation::Chat) => (
                "Sohbet sunucusunda geçici sorun",
                "Lütfen 1 dakika sonra tekrar deneyin",
            ),
            _ => (
                "Beklenmeyen sunucu hatası",
                "Lütfen daha sonra tekrar deneyin",
            ),
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        let (error, solution) = self.message();
        ErrorResponse {
            error: error.to_string(),
            solution: solution.to_string(),
            code: self.error.code().to_string(),
            timestamp: timestamp(),
            detail: self.expose_details.then(|| self.error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}
