use tracing::{debug, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::tokens::Audience,
    domain::entities::user::{Principal, User},
};

use super::user::{AuthUseCases, AuthenticatedUser, SessionGrant};

impl AuthUseCases {
    /// Validates a SESSION token against the live user record. Read-only.
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.tokens.parse_for(token, Audience::Session)?;
        let user = self
            .repo
            .get_by_id(claims.subject_id()?)
            .await?
            .ok_or(AppError::Unauthorized)?;
        claims.require_fresh(user.credentials_updated_at())?;
        Ok(user.into())
    }

    /// Full record of an authenticated requester.
    pub async fn current_user(&self, requester: &AuthenticatedUser) -> AppResult<User> {
        self.repo
            .get_by_id(requester.id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Password login. Unknown email and wrong password are indistinguishable.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionGrant> {
        let user = self
            .repo
            .get_by_email(email.trim())
            .await?
            .filter(|u| self.hasher.verify(password, &u.credential_hash))
            .ok_or_else(|| {
                debug!("Login rejected");
                AppError::InvalidCredential
            })?;

        let token = self.session_token_for(&user)?;
        Ok(SessionGrant { user, token })
    }
}
