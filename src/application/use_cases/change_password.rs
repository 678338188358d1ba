use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{FieldErrors, check_new_password},
    domain::entities::user::Principal,
};

use super::user::{AuthUseCases, AuthenticatedUser};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChangePasswordForm {
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub retype_password: Option<String>,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        errors.password("old_password", self.old_password.as_deref());
        check_new_password(
            &mut errors,
            self.password.as_deref(),
            self.retype_password.as_deref(),
        );
        errors.finish()
    }
}

impl AuthUseCases {
    /// Changes the target's password and stamps a new credentials timestamp,
    /// which makes every earlier token for the target stale.
    ///
    /// Returns a fresh SESSION token for the requester: issued after the new
    /// stamp on a self-change, or the admin's own session otherwise.
    #[instrument(skip(self, requester, form), fields(requester_id = requester.id))]
    pub async fn change_password(
        &self,
        requester: &AuthenticatedUser,
        target_id: i64,
        form: &ChangePasswordForm,
    ) -> AppResult<String> {
        form.validate()?;

        let is_self = requester.id() == target_id;
        if !is_self && !requester.is_good_admin() {
            warn!(target_id, "Password change refused");
            return Err(AppError::Forbidden);
        }

        let target = self
            .repo
            .get_by_id(target_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if is_self {
            let old = form.old_password.as_deref().unwrap_or_default();
            if !self.hasher.verify(old, &target.credential_hash) {
                return Err(AppError::InvalidCredential);
            }
        }

        let new_password = form.password.as_deref().unwrap_or_default();
        let credential_hash = self.hasher.hash(new_password)?;
        let target = self
            .repo
            .update_credential(target.id, &credential_hash, self.tokens.now_millis())
            .await?;

        info!(
            target_id,
            credentials_updated_at = target.credentials_updated_at,
            "Password changed"
        );

        if is_self {
            self.session_token_for(&target)
        } else {
            self.session_token_for(requester)
        }
    }
}
