use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        email_templates,
        tokens::{Audience, claims_of},
        validators::{FieldErrors, check_new_password},
    },
    domain::entities::user::Principal,
};

use super::user::{AuthUseCases, SessionGrant};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResetPasswordForm {
    pub code: Option<String>,
    pub password: Option<String>,
    pub retype_password: Option<String>,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        if self.code.as_deref().is_none_or(|c| c.trim().is_empty()) {
            errors.add("code", "must not be blank");
        }
        check_new_password(
            &mut errors,
            self.password.as_deref(),
            self.retype_password.as_deref(),
        );
        errors.finish()
    }
}

impl AuthUseCases {
    /// Mails a RESET link to the owner of `email`.
    ///
    /// Unknown addresses are reported as `NotFound`, so this endpoint reveals
    /// which emails are registered. That is the product's current contract.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        let mut errors = FieldErrors::new();
        errors.email("email", Some(email));
        errors.finish()?;

        let user = self
            .repo
            .get_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        let code = self.tokens.create_token(
            Audience::Reset,
            &user.id.to_string(),
            self.settings.reset_ttl,
            claims_of([("email", user.email.as_str())]),
        )?;

        let link = self.link("reset-password", &code)?;
        let (subject, html) = email_templates::reset_password(&link);
        self.email.send(&user.email, subject, &html).await?;

        info!(user_id = user.id, "Password reset link sent");
        Ok(())
    }

    /// Redeems a RESET token and sets a new password.
    #[instrument(skip(self, form))]
    pub async fn reset_password(&self, form: &ResetPasswordForm) -> AppResult<SessionGrant> {
        form.validate()?;
        let code = form.code.as_deref().unwrap_or_default();

        let claims = self
            .tokens
            .parse_for(code, Audience::Reset)
            .inspect_err(|err| warn!(reason = %err, "Reset token rejected"))?;
        let user = self
            .repo
            .get_by_id(claims.subject_id()?)
            .await?
            .ok_or(AppError::NotFound)?;

        claims.require_fresh(user.credentials_updated_at())?;
        claims.require_claim("email", user.email())?;

        let credential_hash = self
            .hasher
            .hash(form.password.as_deref().unwrap_or_default())?;
        let user = self
            .repo
            .update_credential(user.id, &credential_hash, self.tokens.now_millis())
            .await?;

        info!(user_id = user.id, "Password reset");
        let token = self.session_token_for(&user)?;
        Ok(SessionGrant { user, token })
    }
}
