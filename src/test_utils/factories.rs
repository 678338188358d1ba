//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use crate::domain::entities::user::User;

/// Fixed "now" used by test clocks, in Unix milliseconds.
pub const T0: i64 = 1_700_000_000_000;

/// Password matching the hash produced by `create_test_user`.
pub const TEST_PASSWORD: &str = "user-password";

/// Create a test user with sensible defaults.
///
/// Defaults: id 1, unverified, no roles, credentials stamped one second before `T0`.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: 1,
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        credential_hash: format!("hashed:{TEST_PASSWORD}"),
        credentials_updated_at: T0 - 1_000,
        verified: false,
        roles: vec![],
    };
    overrides(&mut user);
    user
}
