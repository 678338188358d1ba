use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::use_cases::user::AuthSettings;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub session_token_ttl: Duration,
    pub verify_token_ttl: Duration,
    pub reset_token_ttl: Duration,
    /// Base URL that verification and reset links point to.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub email_from: String,
    /// Without a key, mails are written to the log instead of being sent.
    pub resend_api_key: Option<SecretString>,
    pub admin_email: String,
    pub admin_password: SecretString,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let session_token_ttl_secs: i64 = get_env_default("SESSION_TOKEN_TTL_SECS", 864_000);
        let verify_token_ttl_secs: i64 = get_env_default("VERIFY_TOKEN_TTL_SECS", 86_400);
        let reset_token_ttl_secs: i64 = get_env_default("RESET_TOKEN_TTL_SECS", 900);

        let app_origin: Url = get_env("APP_ORIGIN");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let email_from: String = get_env_default("EMAIL_FROM", "no-reply@localhost".to_string());
        let resend_api_key: Option<SecretString> = std::env::var("RESEND_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| SecretString::new(key.into()));

        let admin_email: String = get_env_default("ADMIN_EMAIL", "admin@localhost".to_string());
        let admin_password: SecretString =
            SecretString::new(get_env::<String>("ADMIN_PASSWORD").into());

        Self {
            jwt_secret,
            session_token_ttl: Duration::seconds(session_token_ttl_secs),
            verify_token_ttl: Duration::seconds(verify_token_ttl_secs),
            reset_token_ttl: Duration::seconds(reset_token_ttl_secs),
            app_origin,
            cors_origin,
            bind_addr,
            database_url,
            email_from,
            resend_api_key,
            admin_email,
            admin_password,
        }
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            session_ttl: self.session_token_ttl,
            verify_ttl: self.verify_token_ttl,
            reset_ttl: self.reset_token_ttl,
            app_origin: self.app_origin.clone(),
        }
    }
}
