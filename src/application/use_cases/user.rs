use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use time::Duration;
use tracing::{info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::tokens::{Audience, TokenService},
    domain::entities::user::{ADMIN_ROLE, NewUser, Principal, User},
};

/// Subject store. Implementations must make `mark_verified` and
/// `update_credential` atomic per record.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn create(&self, user: NewUser) -> AppResult<User>;
    /// Sets `verified` only if it is still false. Returns `None` when the row
    /// is missing or was already verified.
    async fn mark_verified(&self, id: i64) -> AppResult<Option<User>>;
    /// Stores a new hash. The stored stamp becomes
    /// `max(previous + 1, updated_at)`, so it always passes any token issued
    /// against the previous stamp.
    async fn update_credential(
        &self,
        id: i64,
        credential_hash: &str,
        updated_at: i64,
    ) -> AppResult<User>;
}

pub trait CredentialHasher: Send + Sync {
    fn hash(&self, raw: &str) -> AppResult<String>;
    fn verify(&self, raw: &str, hash: &str) -> bool;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

/// Token lifetimes and link origin.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub verify_ttl: Duration,
    pub reset_ttl: Duration,
    pub app_origin: Url,
}

/// Identity attached to a request once its SESSION token passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub roles: Vec<String>,
    pub verified: bool,
    pub credentials_updated_at: i64,
}

impl Principal for AuthenticatedUser {
    fn id(&self) -> i64 {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn credentials_updated_at(&self) -> i64 {
        self.credentials_updated_at
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn is_verified(&self) -> bool {
        self.verified
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles,
            verified: user.verified,
            credentials_updated_at: user.credentials_updated_at,
        }
    }
}

/// A user together with a freshly minted SESSION token.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthUseCases {
    pub(super) repo: Arc<dyn UserRepo>,
    pub(super) tokens: Arc<TokenService>,
    pub(super) hasher: Arc<dyn CredentialHasher>,
    pub(super) email: Arc<dyn EmailSender>,
    pub(super) settings: AuthSettings,
}

impl AuthUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn CredentialHasher>,
        email: Arc<dyn EmailSender>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            repo,
            tokens,
            hasher,
            email,
            settings,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// SESSION token that is guaranteed fresh against the principal's current stamp.
    pub(super) fn session_token_for(&self, principal: &impl Principal) -> AppResult<String> {
        self.tokens.create_token_issued_after(
            Audience::Session,
            &principal.id().to_string(),
            self.settings.session_ttl,
            BTreeMap::new(),
            principal.credentials_updated_at(),
        )
    }

    pub(super) fn link(&self, path: &str, code: &str) -> AppResult<String> {
        let mut url = self
            .settings
            .app_origin
            .join(path)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        url.query_pairs_mut().append_pair("code", code);
        Ok(url.into())
    }

    /// Creates the first admin when no user holds the configured email.
    #[instrument(skip(self, password))]
    pub async fn bootstrap_admin(&self, email: &str, password: &SecretString) -> AppResult<()> {
        if self.repo.get_by_email(email).await?.is_some() {
            return Ok(());
        }
        let credential_hash = self.hasher.hash(password.expose_secret())?;
        let admin = self
            .repo
            .create(NewUser {
                email: email.to_string(),
                name: "Administrator".to_string(),
                credential_hash,
                credentials_updated_at: self.tokens.now_millis(),
                verified: true,
                roles: vec![ADMIN_ROLE.to_string()],
            })
            .await?;
        info!(user_id = admin.id, "Created initial admin user");
        Ok(())
    }
}
