use serde::Serialize;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token audience mismatch: expected {expected}")]
    AudienceMismatch { expected: String },

    #[error("Token claim mismatch: {0}")]
    ClaimMismatch(String),

    #[error("Token was issued before the last credentials update")]
    StaleToken,

    #[error("Already verified")]
    AlreadyVerified,

    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Token ttl must be positive")]
    InvalidTtl,

    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Malformed => ErrorCode::Malformed,
            AppError::SignatureInvalid => ErrorCode::SignatureInvalid,
            AppError::Expired => ErrorCode::Expired,
            AppError::AudienceMismatch { .. } => ErrorCode::AudienceMismatch,
            AppError::ClaimMismatch(_) => ErrorCode::ClaimMismatch,
            AppError::StaleToken => ErrorCode::StaleToken,
            AppError::AlreadyVerified => ErrorCode::AlreadyVerified,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::InvalidCredential => ErrorCode::InvalidCredential,
            AppError::InvalidTtl => ErrorCode::InvalidTtl,
            AppError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the error came out of token parsing or token-to-subject checks.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AppError::Malformed
                | AppError::SignatureInvalid
                | AppError::Expired
                | AppError::AudienceMismatch { .. }
                | AppError::ClaimMismatch(_)
                | AppError::StaleToken
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    Malformed,
    SignatureInvalid,
    Expired,
    AudienceMismatch,
    ClaimMismatch,
    StaleToken,
    AlreadyVerified,
    NotFound,
    Forbidden,
    InvalidCredential,
    InvalidTtl,
    ValidationFailed,
    Unauthorized,
    InvalidInput,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Malformed => "MALFORMED",
            ErrorCode::SignatureInvalid => "SIGNATURE_INVALID",
            ErrorCode::Expired => "EXPIRED",
            ErrorCode::AudienceMismatch => "AUDIENCE_MISMATCH",
            ErrorCode::ClaimMismatch => "CLAIM_MISMATCH",
            ErrorCode::StaleToken => "STALE_TOKEN",
            ErrorCode::AlreadyVerified => "ALREADY_VERIFIED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InvalidCredential => "INVALID_CREDENTIAL",
            ErrorCode::InvalidTtl => "INVALID_TTL",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
