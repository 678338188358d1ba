use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::user::{NewUser, User},
    use_cases::user::UserRepo,
};

const USER_COLUMNS: &str =
    "id, email, name, credential_hash, credentials_updated_at, verified, roles";

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub struct UserDb {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub credential_hash: String,
    pub credentials_updated_at: i64,
    pub verified: bool,
    pub roles: Vec<String>,
}

impl From<UserDb> for User {
    fn from(row: UserDb) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            credential_hash: row.credential_hash,
            credentials_updated_at: row.credentials_updated_at,
            verified: row.verified,
            roles: row.roles,
        }
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserDb>(&format!(
            r#"
                INSERT INTO users (email, name, credential_hash, credentials_updated_at, verified, roles)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.credential_hash)
        .bind(user.credentials_updated_at)
        .bind(user.verified)
        .bind(&user.roles)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn mark_verified(&self, id: i64) -> AppResult<Option<User>> {
        // Conditional update: of two concurrent redemptions only one sees a row.
        let row = sqlx::query_as::<_, UserDb>(&format!(
            "UPDATE users SET verified = TRUE WHERE id = $1 AND verified = FALSE RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(User::from))
    }

    async fn update_credential(
        &self,
        id: i64,
        credential_hash: &str,
        updated_at: i64,
    ) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserDb>(&format!(
            r#"
                UPDATE users
                SET credential_hash = $2,
                    credentials_updated_at = GREATEST(credentials_updated_at + 1, $3)
                WHERE id = $1
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(credential_hash)
        .bind(updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        row.map(User::from).ok_or(AppError::NotFound)
    }
}
