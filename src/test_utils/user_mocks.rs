//! In-memory mock implementations of the user-related ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::user::{CredentialHasher, EmailSender, UserRepo},
    domain::entities::user::{NewUser, User},
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

/// In-memory implementation of UserRepo for testing.
///
/// A single mutex guards the map, so every read-modify-write is atomic.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<i64, User>>,
    stale_reads: AtomicBool,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<i64, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
            ..Default::default()
        }
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Reads return what a request would have seen just before a concurrent
    /// writer committed: users look unverified and email lookups miss.
    /// Writes still go to the live map.
    pub fn serve_stale_reads(&self) {
        self.stale_reads.store(true, Ordering::SeqCst);
    }

    fn stale(&self) -> bool {
        self.stale_reads.load(Ordering::SeqCst)
    }

    /// Bypasses the monotonic guard, for simulating out-of-band credential changes.
    pub fn set_credentials_updated_at(&self, id: i64, at: i64) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.credentials_updated_at = at;
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = self.users.lock().unwrap().get(&id).cloned();
        if self.stale() {
            return Ok(user.map(|u| User {
                verified: false,
                ..u
            }));
        }
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        if self.stale() {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::InvalidInput(
                "A record with this value already exists".into(),
            ));
        }

        let id = users.keys().max().copied().unwrap_or(0) + 1;
        let user = User {
            id,
            email: user.email,
            name: user.name,
            credential_hash: user.credential_hash,
            credentials_updated_at: user.credentials_updated_at,
            verified: user.verified,
            roles: user.roles,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn mark_verified(&self, id: i64) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) if !user.verified => {
                user.verified = true;
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_credential(
        &self,
        id: i64,
        credential_hash: &str,
        updated_at: i64,
    ) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.credential_hash = credential_hash.to_string();
        user.credentials_updated_at = (user.credentials_updated_at + 1).max(updated_at);
        Ok(user.clone())
    }
}

// ============================================================================
// PlainHasher
// ============================================================================

/// Reversible stand-in for the Argon2 hasher; keeps tests fast.
#[derive(Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, raw: &str) -> AppResult<String> {
        Ok(format!("hashed:{raw}"))
    }

    fn verify(&self, raw: &str, hash: &str) -> bool {
        hash.strip_prefix("hashed:") == Some(raw)
    }
}

// ============================================================================
// InMemoryEmailSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email sender that records messages instead of delivering them.
#[derive(Default)]
pub struct InMemoryEmailSender {
    emails: Mutex<Vec<CapturedEmail>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.emails.lock().unwrap().push(CapturedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}
