use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::AddressResponse;
use crate::middleware::{ApiResult, AuthUser, IntoApiResponse};
use crate::state::AppState;

/// POST /api/contacts/:contactId/addresses
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AddressResponse> {
    let Json(request) = body?;
    let address = state.addresses.create(&user, &contact_id, &request).await?;
    Ok(address.into_api_response())
}

/// GET /api/contacts/:contactId/addresses
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> ApiResult<Vec<AddressResponse>> {
    let addresses = state.addresses.list(&user, &contact_id).await?;
    Ok(addresses.into_api_response())
}

/// GET /api/contacts/:contactId/addresses/:addressId
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<AddressResponse> {
    let address = state.addresses.get(&user, &contact_id, &address_id).await?;
    Ok(address.into_api_response())
}

/// PUT /api/contacts/:contactId/addresses/:addressId
///
/// The address id comes from the path and overrides any `id` in the body.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AddressResponse> {
    let Json(mut request) = body?;
    if let Value::Object(fields) = &mut request {
        fields.insert("id".to_string(), Value::String(address_id));
    }

    let address = state.addresses.update(&user, &contact_id, &request).await?;
    Ok(address.into_api_response())
}

/// DELETE /api/contacts/:contactId/addresses/:addressId
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<&'static str> {
    let confirmation = state.addresses.remove(&user, &contact_id, &address_id).await?;
    Ok(confirmation.into_api_response())
}
