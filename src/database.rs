//! database (db) union structure.
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::Postgres;

pub const DEFAULT_CREDENTIALS: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "stockpile";
pub const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_PORT: u16 = 5432;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing `postgres` entry on `config.yaml` file")]
    MissingConfig,
    #[error("invalid PostgreSQL port in `{0}`")]
    InvalidPort(String),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Process-wide storage handle, safe to share between requests.
#[derive(Clone)]
pub struct Database {
    pub postgres: PgPool,
}

impl Database {
    /// Init database connections from the `postgres` configuration entry.
    pub async fn new(config: Option<&Postgres>) -> Result<Self, Error> {
        let config = config.ok_or(Error::MissingConfig)?;
        let options = connect_options(config)?;

        let postgres = PgPoolOptions::new()
            .max_connections(config.pool_size.unwrap_or(DEFAULT_POOL_SIZE))
            .connect_with(options)
            .await?;

        tracing::info!(hostname = %config.address, "postgres connected");

        Ok(Self { postgres })
    }

    /// Create or upgrade tables.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.postgres).await?;
        tracing::trace!("migrations applied");
        Ok(())
    }
}

/// Credentials are passed as they are, never through a URL.
fn connect_options(config: &Postgres) -> Result<PgConnectOptions, Error> {
    let (host, port) = match config.address.rsplit_once(':') {
        Some((host, port)) => (
            host,
            port.parse::<u16>()
                .map_err(|_| Error::InvalidPort(config.address.clone()))?,
        ),
        None => (config.address.as_str(), DEFAULT_PORT),
    };

    Ok(PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(config.username.as_deref().unwrap_or(DEFAULT_CREDENTIALS))
        .password(config.password.as_deref().unwrap_or(DEFAULT_CREDENTIALS))
        .database(
            config
                .database
                .as_deref()
                .unwrap_or(DEFAULT_DATABASE_NAME),
        ))
}
