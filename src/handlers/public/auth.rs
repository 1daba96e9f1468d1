use axum::Json;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, AuthSession};
use crate::validation::{LoginRequest, RegisterRequest};

/// POST /auth/register - Create a tenant and its first user account.
///
/// Returns a session token plus the created user (without password
/// hash). Duplicate email yields 409, invalid payload 400 with
/// per-field errors.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthSession> {
    let service = AuthService::new().await?;
    let session = service.register(payload).await?;
    Ok(ApiResponse::created(session))
}

/// POST /auth/login - Authenticate and receive a session token.
///
/// Unknown email and wrong password both produce the same 401.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<AuthSession> {
    let service = AuthService::new().await?;
    let session = service.login(payload).await?;
    Ok(ApiResponse::success(session))
}
