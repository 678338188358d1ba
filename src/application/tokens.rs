use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    app_error::{AppError, AppResult},
    application::{clock::Clock, jwt::Signer},
};

/// Flow a token is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Session,
    Verify,
    Reset,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Session => "SESSION",
            Audience::Verify => "VERIFY",
            Audience::Reset => "RESET",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded token payload. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub aud: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub claims: BTreeMap<String, String>,
}

impl TokenClaims {
    /// Subject id as the numeric key used by the store.
    pub fn subject_id(&self) -> AppResult<i64> {
        self.sub.parse().map_err(|_| AppError::Malformed)
    }

    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).map(String::as_str)
    }

    /// The token must postdate the subject's last credentials update.
    pub fn require_fresh(&self, credentials_updated_at: i64) -> AppResult<()> {
        if self.iat > credentials_updated_at {
            Ok(())
        } else {
            Err(AppError::StaleToken)
        }
    }

    pub fn require_claim(&self, name: &str, expected: &str) -> AppResult<()> {
        match self.claim(name) {
            Some(value) if value == expected => Ok(()),
            _ => Err(AppError::ClaimMismatch(name.to_string())),
        }
    }
}

/// Issues and parses audience-scoped tokens. Holds no per-subject state.
pub struct TokenService {
    signer: Signer,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(signer: Signer, clock: Arc<dyn Clock>) -> Self {
        Self { signer, clock }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn create_token(
        &self,
        audience: Audience,
        subject: &str,
        ttl: Duration,
        claims: BTreeMap<String, String>,
    ) -> AppResult<String> {
        self.mint(audience.as_str(), subject, self.now_millis(), ttl, claims)
    }

    /// Like `create_token`, but the token is issued strictly after `floor_millis`.
    ///
    /// Used right after a credentials stamp so the new token is never stale
    /// against the stamp it follows, even within the same millisecond.
    pub fn create_token_issued_after(
        &self,
        audience: Audience,
        subject: &str,
        ttl: Duration,
        claims: BTreeMap<String, String>,
        floor_millis: i64,
    ) -> AppResult<String> {
        let issued_at = self.now_millis().max(floor_millis + 1);
        self.mint(audience.as_str(), subject, issued_at, ttl, claims)
    }

    /// Mint with an arbitrary audience tag.
    #[cfg(test)]
    pub fn create_token_for(
        &self,
        audience: &str,
        subject: &str,
        ttl: Duration,
        claims: BTreeMap<String, String>,
    ) -> AppResult<String> {
        self.mint(audience, subject, self.now_millis(), ttl, claims)
    }

    fn mint(
        &self,
        audience: &str,
        subject: &str,
        issued_at: i64,
        ttl: Duration,
        claims: BTreeMap<String, String>,
    ) -> AppResult<String> {
        let ttl_millis = ttl.whole_milliseconds();
        if ttl_millis <= 0 {
            return Err(AppError::InvalidTtl);
        }
        let ttl_millis = i64::try_from(ttl_millis).map_err(|_| AppError::InvalidTtl)?;

        let payload = TokenClaims {
            aud: audience.to_string(),
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_millis),
            claims,
        };
        self.signer.sign(&payload)
    }

    pub fn parse_token(&self, token: &str) -> AppResult<TokenClaims> {
        let claims: TokenClaims = self.signer.verify(token)?;
        if self.now_millis() > claims.exp {
            return Err(AppError::Expired);
        }
        Ok(claims)
    }

    pub fn require_audience(claims: &TokenClaims, expected: Audience) -> AppResult<()> {
        if claims.aud == expected.as_str() {
            Ok(())
        } else {
            Err(AppError::AudienceMismatch {
                expected: expected.as_str().to_string(),
            })
        }
    }

    /// Parse and require the audience in one step.
    pub fn parse_for(&self, token: &str, audience: Audience) -> AppResult<TokenClaims> {
        let claims = self.parse_token(token)?;
        Self::require_audience(&claims, audience)?;
        Ok(claims)
    }
}

/// Build a claim map from pairs.
pub fn claims_of<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
