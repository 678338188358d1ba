use crate::{
    adapters::{
        email::{log::LogEmailSender, resend::ResendEmailSender},
        http::app_state::AppState,
    },
    application::{clock::SystemClock, jwt::Signer, tokens::TokenService},
    infra::{config::AppConfig, error::InfraError, password::Argon2Hasher, postgres_persistence},
    use_cases::user::{AuthUseCases, EmailSender, UserRepo},
};
use std::fs::File;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> Result<AppState, InfraError> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let email: Arc<dyn EmailSender> = match &config.resend_api_key {
        Some(key) => Arc::new(ResendEmailSender::new(key.clone(), config.email_from.clone())),
        None => {
            warn!("RESEND_API_KEY not set, emails will only be logged");
            Arc::new(LogEmailSender)
        }
    };

    let tokens = Arc::new(TokenService::new(
        Signer::new(&config.jwt_secret),
        Arc::new(SystemClock),
    ));

    let auth_use_cases = AuthUseCases::new(
        postgres_arc as Arc<dyn UserRepo>,
        tokens,
        Arc::new(Argon2Hasher),
        email,
        config.auth_settings(),
    );

    auth_use_cases
        .bootstrap_admin(&config.admin_email, &config.admin_password)
        .await
        .map_err(InfraError::AdminBootstrap)?;
    info!(admin_email = %config.admin_email, "Admin account ready");

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tokengate=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
