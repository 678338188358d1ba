use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::tokens::Audience,
    domain::entities::user::Principal,
};

use super::user::{AuthUseCases, SessionGrant};

impl AuthUseCases {
    /// Consumes a VERIFY token addressed to `user_id` and marks the user verified.
    ///
    /// Every check is a hard gate; a rejected attempt leaves the user untouched.
    #[instrument(skip(self, code))]
    pub async fn verify_user(&self, user_id: i64, code: &str) -> AppResult<SessionGrant> {
        let claims = self
            .tokens
            .parse_for(code, Audience::Verify)
            .inspect_err(|err| warn!(user_id, reason = %err, "Verification token rejected"))?;

        let user = self.repo.get_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        if claims.subject_id()? != user.id() {
            warn!(user_id, token_sub = %claims.sub, "Verification token addressed to another user");
            return Err(AppError::ClaimMismatch("sub".into()));
        }

        claims.require_fresh(user.credentials_updated_at())?;
        claims.require_claim("email", user.email())?;

        if user.is_verified() {
            return Err(AppError::AlreadyVerified);
        }

        // Conditional update: a concurrent verification wins exactly once.
        let user = self
            .repo
            .mark_verified(user.id)
            .await?
            .ok_or(AppError::AlreadyVerified)?;

        info!(user_id = user.id, "User verified");
        let token = self.session_token_for(&user)?;
        Ok(SessionGrant { user, token })
    }
}
