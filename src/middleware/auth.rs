use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller resolved from the `Authorization` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub name: String,
}

impl AuthUser {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
        }
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
        }
    }
}

/// Token authentication middleware: resolves the token to a user and injects
/// [`AuthUser`] into the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let user = state
        .gateway
        .find_user_by_token(&token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Rejected request with unknown token");
            ApiError::unauthorized("Unauthorized")
        })?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Raw token from the Authorization header; a `Bearer` scheme is accepted and stripped
fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.strip_prefix("Bearer") {
        // a bare "Bearer" carries no credential
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
