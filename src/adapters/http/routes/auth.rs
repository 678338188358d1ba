use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, middleware::auth_token_headers, routes::SessionResponse},
    app_error::{AppError, AppResult},
    use_cases::forgot_password::ResetPasswordForm,
};

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ForgotPasswordQuery {
    email: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let grant = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await
        .map_err(|err| match err {
            AppError::InvalidCredential => AppError::Unauthorized,
            other => other,
        })?;
    let headers = auth_token_headers(&grant.token)?;
    Ok((StatusCode::OK, headers, Json(SessionResponse::from(grant))))
}

async fn forgot_password(
    State(app_state): State<AppState>,
    Query(query): Query<ForgotPasswordQuery>,
) -> AppResult<impl IntoResponse> {
    let email = query
        .email
        .ok_or_else(|| AppError::InvalidInput("Missing query parameter 'email'".into()))?;
    app_state.auth_use_cases.forgot_password(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_password(
    State(app_state): State<AppState>,
    Json(form): Json<ResetPasswordForm>,
) -> AppResult<impl IntoResponse> {
    let grant = app_state.auth_use_cases.reset_password(&form).await?;
    let headers = auth_token_headers(&grant.token)?;
    Ok((StatusCode::NO_CONTENT, headers))
}
