use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult, FieldError},
    application::{
        email_templates,
        tokens::{Audience, claims_of},
        validators::{FieldErrors, NAME_MAX, NAME_MIN},
    },
    domain::entities::user::{NewUser, User},
};

use super::user::{AuthUseCases, SessionGrant};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        errors.email("email", self.email.as_deref());
        errors.password("password", self.password.as_deref());
        errors.length("name", self.name.as_deref(), NAME_MIN, NAME_MAX);
        errors.finish()
    }
}

impl AuthUseCases {
    /// Creates an unverified user, mails a VERIFY link and signs the user in.
    #[instrument(skip(self, form), fields(email = form.email.as_deref().unwrap_or_default()))]
    pub async fn signup(&self, form: &SignupForm) -> AppResult<SessionGrant> {
        form.validate()?;
        let email = form.email.as_deref().unwrap_or_default().trim();

        if self.repo.get_by_email(email).await?.is_some() {
            return Err(email_in_use());
        }

        let credential_hash = self.hasher.hash(form.password.as_deref().unwrap_or_default())?;
        let user = self
            .repo
            .create(NewUser {
                email: email.to_string(),
                name: form.name.as_deref().unwrap_or_default().trim().to_string(),
                credential_hash,
                credentials_updated_at: self.tokens.now_millis(),
                verified: false,
                roles: vec![],
            })
            .await
            .map_err(|err| match err {
                // Unique violation: a concurrent signup took the email first.
                AppError::InvalidInput(_) => email_in_use(),
                other => other,
            })?;

        info!(user_id = user.id, "User signed up");

        // Delivery failure does not undo the signup; the user can ask again.
        if let Err(err) = self.send_verification_mail(&user).await {
            warn!(error = ?err, user_id = user.id, "Sending verification mail failed");
        }

        let token = self.session_token_for(&user)?;
        Ok(SessionGrant { user, token })
    }

    /// Issues a VERIFY token for the user and mails it.
    pub async fn send_verification_mail(&self, user: &User) -> AppResult<()> {
        let code = self.tokens.create_token_issued_after(
            Audience::Verify,
            &user.id.to_string(),
            self.settings.verify_ttl,
            claims_of([("email", user.email.as_str())]),
            user.credentials_updated_at,
        )?;
        let link = self.link(&format!("users/{}/verification", user.id), &code)?;
        let (subject, html) = email_templates::verify_email(&link);
        self.email.send(&user.email, subject, &html).await
    }
}

fn email_in_use() -> AppError {
    AppError::ValidationFailed(vec![FieldError::new("email", "already in use")])
}
