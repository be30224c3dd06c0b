//! Server configuration, read from the command line with environment
//! fallbacks. A `.env` file in the working directory is loaded first.

use clap::Parser;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

#[derive(Debug, Parser)]
#[command(name = "bella-json", about = "Bella storefront JSON API server", long_about = None)]
pub struct ServerConfig {
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(flatten)]
    pub observability: ObservabilityConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns the clap error for missing or malformed settings.
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env is fine; real environments set variables directly.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
