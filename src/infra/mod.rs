use crate::{
    adapters::persistence::PostgresPersistence,
    infra::{
        db::{init_db, run_migrations},
        error::InfraError,
    },
};

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod password;
pub mod setup;

pub async fn postgres_persistence(database_url: &str) -> Result<PostgresPersistence, InfraError> {
    let pool = init_db(database_url).await?;
    run_migrations(&pool).await?;
    Ok(PostgresPersistence::new(pool))
}
