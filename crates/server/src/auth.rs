use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::repository::AuthRepository;
use service::auth::AuthService;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
}

/// Subject id recovered from the bearer token; injected into request
/// extensions by the middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

#[derive(Serialize)]
pub struct TokenOutput {
    pub token: String,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenOutput>, ApiError> {
    let session = state.auth.login(input).await?;
    Ok(Json(TokenOutput { token: session.token }))
}

pub async fn list_users(
    State(state): State<ServerState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<AuthUser>>, ApiError> {
    let users = state.auth.list_users().await?;
    Ok(Json(users))
}

/// Global middleware: outside the public whitelist, require
/// `Authorization: Bearer <token>`. Missing, invalid, and expired tokens all
/// answer 401; failures are logged.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();
    let method = req.method().clone();

    // Public: health, registration, login, CORS preflight
    if path == "/"
        || path == "/users/login"
        || (path == "/users" && method == Method::POST)
        || method == Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let token = match req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::unauthorized("Token de acesso ausente"));
            }
        },
        None => {
            warn!(path = %path, "missing Authorization header");
            return Err(ApiError::unauthorized("Token de acesso ausente"));
        }
    };

    match state.auth.identity(&token) {
        Ok(subject) => {
            req.extensions_mut().insert(AuthenticatedUser(subject));
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, code = e.code(), err = %e, "token validation failed");
            Err(ApiError::unauthorized("Token inválido ou expirado"))
        }
    }
}
