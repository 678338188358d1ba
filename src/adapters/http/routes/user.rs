use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{SessionUser, auth_token_headers},
        routes::SessionResponse,
    },
    app_error::{AppError, AppResult},
    domain::entities::user::UserView,
    use_cases::{change_password::ChangePasswordForm, signup::SignupForm},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(signup))
        .route("/users/{id}/verification", post(verify))
        .route("/users/{id}/password", post(change_password))
        .route("/context", get(context))
}

#[derive(Deserialize)]
struct VerificationQuery {
    code: Option<String>,
}

/// POST /api/users
async fn signup(
    State(app_state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> AppResult<impl IntoResponse> {
    let grant = app_state.auth_use_cases.signup(&form).await?;
    let headers = auth_token_headers(&grant.token)?;
    Ok((StatusCode::CREATED, headers, Json(SessionResponse::from(grant))))
}

/// POST /api/users/{id}/verification?code=...
async fn verify(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<VerificationQuery>,
) -> AppResult<impl IntoResponse> {
    let code = query
        .code
        .ok_or_else(|| AppError::InvalidInput("Missing query parameter 'code'".into()))?;
    let grant = app_state.auth_use_cases.verify_user(id, &code).await?;
    let headers = auth_token_headers(&grant.token)?;
    Ok((StatusCode::OK, headers, Json(SessionResponse::from(grant))))
}

/// POST /api/users/{id}/password
///
/// The requester gets a fresh session token in `x-auth-token`.
async fn change_password(
    State(app_state): State<AppState>,
    SessionUser(requester): SessionUser,
    Path(id): Path<i64>,
    Json(form): Json<ChangePasswordForm>,
) -> AppResult<impl IntoResponse> {
    let token = app_state
        .auth_use_cases
        .change_password(&requester, id, &form)
        .await?;
    let headers = auth_token_headers(&token)?;
    Ok((StatusCode::NO_CONTENT, headers))
}

/// GET /api/context
async fn context(
    State(app_state): State<AppState>,
    SessionUser(requester): SessionUser,
) -> AppResult<impl IntoResponse> {
    let user = app_state.auth_use_cases.current_user(&requester).await?;
    Ok(Json(UserView::from(&user)))
}
