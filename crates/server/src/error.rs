//! Mapping of extraction and collaborator failures to HTTP responses.
//!
//! Bodies carry a stable error code and never any selector or threshold detail.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use referent_core::{FailureReason, ReferentError};
use serde_json::{Value, json};
use tracing::{error, warn};

pub const MISSING_URL_MESSAGE: &str = "URL is required in body: { url: string }";

#[derive(Debug)]
pub enum ApiError {
    /// The request body had no usable `url`.
    MissingUrl,
    /// The page was fetched but yielded no usable article.
    Extraction(FailureReason),
    /// A collaborator failed.
    Core(ReferentError),
}

impl From<ReferentError> for ApiError {
    fn from(e: ReferentError) -> Self {
        ApiError::Core(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::Extraction(reason) => {
                StatusCode::from_u16(reason.status()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::Core(e) => match e {
                ReferentError::Fetch { .. } | ReferentError::Http(_) | ReferentError::InvalidUrl(_) => {
                    StatusCode::BAD_GATEWAY
                }
                ReferentError::TokenLimit => StatusCode::PAYMENT_REQUIRED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::MissingUrl => json!({ "error": MISSING_URL_MESSAGE }),
            ApiError::Extraction(reason) if reason.is_access_gated() => {
                json!({ "error": "PAYWALL_ERROR", "message": reason.message() })
            }
            ApiError::Extraction(reason) => json!({ "error": "CONTENT_NOT_FOUND", "message": reason.message() }),
            ApiError::Core(e) => match e {
                ReferentError::Fetch { .. } | ReferentError::Http(_) | ReferentError::InvalidUrl(_) => json!({
                    "error": "FETCH_ERROR",
                    "statusCode": e.status_code(),
                    "isTimeout": e.is_timeout(),
                }),
                ReferentError::TokenLimit => json!({ "error": "TOKEN_LIMIT_ERROR" }),
                ReferentError::Config(_) => json!({ "error": "API_CONFIG_ERROR" }),
                _ => json!({ "error": "PROCESSING_ERROR" }),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Core(e) if status.is_server_error() => error!(error = %e, "request failed"),
            ApiError::Core(e) => warn!(error = %e, "request failed"),
            ApiError::Extraction(reason) => warn!(?reason, "no usable article"),
            ApiError::MissingUrl => {}
        }

        (status, Json(self.body())).into_response()
    }
}
