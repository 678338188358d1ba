use std::collections::HashSet;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};

use crate::app_error::{AppError, AppResult};

/// HS256 compact-token signer.
///
/// Knows nothing about audiences or expiry: `verify` only checks structure and
/// signature. Any decoding failure is reported as `Malformed`, a bad MAC or a
/// substituted algorithm as `SignatureInvalid`.
pub struct Signer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Signer {
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    pub fn sign<T: Serialize>(&self, payload: &T) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), payload, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> AppResult<T> {
        decode::<T>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AppError::SignatureInvalid
                }
                _ => AppError::Malformed,
            })
    }
}
