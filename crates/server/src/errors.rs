use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use service::auth::errors::AuthError;

/// Boundary error: an HTTP status plus the JSON `error` message shown to the
/// client. Client-facing wording follows the original service.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn unauthorized(message: &str) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, message: message.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let (status, message) = match &err {
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "email e password são obrigatórios"),
            AuthError::Conflict => (StatusCode::CONFLICT, "Email já cadastrado"),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Email ou senha inválidos"),
            AuthError::Token(_) => (StatusCode::UNAUTHORIZED, "Token inválido ou expirado"),
            AuthError::Hash(_) | AuthError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "erro interno"),
        };
        if status.is_server_error() {
            error!(code = err.code(), err = %err, "auth request failed");
        } else {
            warn!(code = err.code(), err = %err, "auth request rejected");
        }
        Self { status, message: message.to_string() }
    }
}
