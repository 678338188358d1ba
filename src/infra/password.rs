use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand::Rng;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::user::CredentialHasher,
};

/// Argon2id with default parameters, PHC string output.
#[derive(Default, Clone)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    fn salt() -> AppResult<SaltString> {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill(&mut bytes);
        SaltString::encode_b64(&bytes).map_err(|e| AppError::Internal(e.to_string()))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, raw: &str) -> AppResult<String> {
        Argon2::default()
            .hash_password(raw.as_bytes(), &Self::salt()?)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    fn verify(&self, raw: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .ok()
            .as_ref()
            .map(|parsed| {
                Argon2::default()
                    .verify_password(raw.as_bytes(), parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
