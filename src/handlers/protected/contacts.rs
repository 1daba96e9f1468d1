use axum::extract::Path;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::database::models::Contact;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ContactService;
use crate::validation::{ContactPayload, ContactUpdate};

/// GET /api/contacts - List all contacts of the caller's tenant.
pub async fn list(Extension(caller): Extension<AuthUser>) -> ApiResult<Vec<Contact>> {
    let service = ContactService::new().await?;
    let contacts = service.find_all(&caller).await?;
    Ok(ApiResponse::success(contacts))
}

/// POST /api/contacts - Create a contact under the caller's tenant.
pub async fn create(
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<ContactPayload>,
) -> ApiResult<Contact> {
    let service = ContactService::new().await?;
    let contact = service.create(&caller, payload).await?;
    Ok(ApiResponse::created(contact))
}

/// GET /api/contacts/:id - Fetch one contact.
///
/// A contact that exists under another tenant responds exactly like a
/// contact that does not exist.
pub async fn get(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Contact> {
    let service = ContactService::new().await?;
    let contact = service.find_one(&caller, id).await?;
    Ok(ApiResponse::success(contact))
}

/// PUT /api/contacts/:id - Partially update one contact.
pub async fn update(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactUpdate>,
) -> ApiResult<Contact> {
    let service = ContactService::new().await?;
    let contact = service.update(&caller, id, payload).await?;
    Ok(ApiResponse::success(contact))
}

/// DELETE /api/contacts/:id - Delete one contact, returning the
/// removed row.
pub async fn delete(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Contact> {
    let service = ContactService::new().await?;
    let contact = service.delete(&caller, id).await?;
    Ok(ApiResponse::success(contact))
}
