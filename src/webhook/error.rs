use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::WebhookResponse;

/// Every way the gateway can refuse or fail a webhook call.
///
/// The display text doubles as the user-facing `error.message`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Backend connection is not configured.")]
    Config,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid request body.")]
    BadRequest,
    #[error("The backend service returned an error (status: {0}).")]
    BackendStatus(u16),
    #[error("The backend service could not be reached.")]
    BackendUnreachable,
    #[error("No mock handler for event: {0}")]
    UnknownEvent(String),
    #[error("An internal server error occurred in the gateway.")]
    Internal,
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Config => "CONFIG_ERROR",
            GatewayError::Unauthorized => "UNAUTHORIZED",
            GatewayError::BadRequest => "BAD_REQUEST",
            GatewayError::BackendStatus(_) | GatewayError::BackendUnreachable => "BACKEND_ERROR",
            GatewayError::UnknownEvent(_) => "NOT_FOUND",
            GatewayError::Internal => "GATEWAY_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Config | GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::BadRequest => StatusCode::BAD_REQUEST,
            GatewayError::BackendStatus(_) | GatewayError::BackendUnreachable => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::UnknownEvent(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn correlation_id(&self) -> &'static str {
        match self {
            GatewayError::Config => "local-config-error",
            GatewayError::Unauthorized => "local-auth-error",
            GatewayError::BadRequest => "local-request-error",
            GatewayError::BackendStatus(_) | GatewayError::BackendUnreachable => {
                "n8n-network-error"
            }
            GatewayError::UnknownEvent(_) => "mock-not-found",
            GatewayError::Internal => "local-gateway-error",
        }
    }

    pub fn envelope(&self) -> WebhookResponse {
        WebhookResponse::failure(self.code(), self.to_string(), self.correlation_id())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}
