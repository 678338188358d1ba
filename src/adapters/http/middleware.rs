use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, HeaderValue, header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::{
    adapters::http::app_state::AppState, app_error::AppError,
    use_cases::user::AuthenticatedUser,
};

/// Response header carrying a newly issued SESSION token.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Requester identity for protected routes.
///
/// Reads `Authorization: Bearer <token>` and runs it through the session gate.
/// Every failure is reported to the client as `Unauthorized`; the precise
/// reason only goes to the log.
#[derive(Debug, Clone)]
pub struct SessionUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        match app_state.auth_use_cases.authenticate(token).await {
            Ok(user) => Ok(SessionUser(user)),
            Err(err) if err.is_token_rejection() || matches!(err, AppError::Unauthorized) => {
                warn!(reason = %err, "Session token rejected");
                Err(AppError::Unauthorized)
            }
            Err(err) => Err(err),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Header map carrying `token` in `x-auth-token`.
pub fn auth_token_headers(token: &str) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(token).map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(AUTH_TOKEN_HEADER, value);
    Ok(headers)
}
