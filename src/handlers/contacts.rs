use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::ContactResponse;
use crate::middleware::{ApiResult, AuthUser, IntoApiResponse};
use crate::state::AppState;

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ContactResponse> {
    let Json(request) = body?;
    let contact = state.contacts.create(&user, &request).await?;
    Ok(contact.into_api_response())
}

/// GET /api/contacts/:contactId
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> ApiResult<ContactResponse> {
    let contact = state.contacts.get(&user, &contact_id).await?;
    Ok(contact.into_api_response())
}
