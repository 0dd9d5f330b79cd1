//! Environment configuration
//!
//! All deployment knobs come from the environment, matching the container
//! setup this service ships in. Store credentials and ports are required;
//! host and database name have defaults.

use std::env;

use anyhow::Context;

/// Runtime configuration read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Store host; `MONGO_HOST`, defaults to `localhost`
    pub db_host: String,

    /// Store credentials; `MONGO_ROOT_USERNAME` / `MONGO_ROOT_PASSWORD`
    pub db_username: String,
    pub db_password: String,

    /// Store port; `MONGO_PORT_NUMBER`
    pub db_port: String,

    /// Database name; `GATEWAY_DB_NAME`, defaults to `task`
    pub db_name: String,

    /// HTTP listen port; `APP_PORT_NUMBER`
    pub app_port: String,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Fails if any required variable is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            db_host: env::var("MONGO_HOST").unwrap_or_else(|_| "localhost".to_string()),
            db_username: env::var("MONGO_ROOT_USERNAME")
                .context("MONGO_ROOT_USERNAME is not set")?,
            db_password: env::var("MONGO_ROOT_PASSWORD")
                .context("MONGO_ROOT_PASSWORD is not set")?,
            db_port: env::var("MONGO_PORT_NUMBER").context("MONGO_PORT_NUMBER is not set")?,
            db_name: env::var("GATEWAY_DB_NAME").unwrap_or_else(|_| "task".to_string()),
            app_port: env::var("APP_PORT_NUMBER").context("APP_PORT_NUMBER is not set")?,
        })
    }
}
