use serde::Serialize;

pub const ADMIN_ROLE: &str = "ADMIN";

/// The facets of a subject the token checks and authorization rules read.
pub trait Principal {
    fn id(&self) -> i64;
    fn email(&self) -> &str;
    /// Unix milliseconds of the last credentials change.
    fn credentials_updated_at(&self) -> i64;
    fn roles(&self) -> &[String];
    fn is_verified(&self) -> bool;

    fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    /// Admin authority is only granted to verified admins.
    fn is_good_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE) && self.is_verified()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub credential_hash: String,
    pub credentials_updated_at: i64,
    pub verified: bool,
    pub roles: Vec<String>,
}

impl Principal for User {
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

/// Fields needed to create a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub credential_hash: String,
    pub credentials_updated_at: i64,
    pub verified: bool,
    pub roles: Vec<String>,
}

/// Public projection of a user, safe to return over HTTP.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub verified: bool,
    pub admin: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.roles.clone(),
            verified: user.verified,
            admin: user.is_good_admin(),
        }
    }
}
