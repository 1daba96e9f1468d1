use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Echo the authenticated caller's claims.
pub async fn whoami(Extension(caller): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "userId": caller.user_id,
        "tenantId": caller.tenant_id,
    })))
}
