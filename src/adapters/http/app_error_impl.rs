use crate::app_error::{AppError, ErrorCode, FieldError};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Malformed | AppError::SignatureInvalid | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Expired
            | AppError::AudienceMismatch { .. }
            | AppError::ClaimMismatch(_)
            | AppError::StaleToken
            | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyVerified
            | AppError::InvalidCredential
            | AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTtl | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = %self, %status, "Request rejected");
        }

        let code = self.code();
        match self {
            AppError::InvalidInput(msg) => error_resp(status, code, Some(msg), None),
            AppError::AudienceMismatch { expected } => error_resp(
                status,
                code,
                Some(format!("Token is not valid for {expected}")),
                None,
            ),
            AppError::ClaimMismatch(claim) => error_resp(
                status,
                code,
                Some(format!("Token claim '{claim}' does not match")),
                None,
            ),
            AppError::ValidationFailed(errors) => error_resp(status, code, None, Some(errors)),
            // Internal details stay in the log.
            _ => error_resp(status, code, None, None),
        }
    }
}

fn error_resp(
    status: StatusCode,
    code: ErrorCode,
    message: Option<String>,
    errors: Option<Vec<FieldError>>,
) -> Response {
    let mut body = serde_json::json!({ "code": code.as_str() });
    if let Some(msg) = message {
        body["message"] = serde_json::Value::String(msg);
    }
    if let Some(errors) = errors {
        body["errors"] = serde_json::json!(errors);
    }
    (status, Json(body)).into_response()
}
