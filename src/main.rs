//! Payment Gateway service binary
//!
//! Reads configuration from the environment, connects to the document
//! store under the bootstrap deadline, and serves the HTTP API until the
//! process is stopped.
//!
//! # Environment
//!
//! - `MONGO_HOST` (default `localhost`), `MONGO_PORT_NUMBER`
//! - `MONGO_ROOT_USERNAME`, `MONGO_ROOT_PASSWORD`
//! - `GATEWAY_DB_NAME` (default `task`)
//! - `APP_PORT_NUMBER`
//! - `RUST_LOG` for log filtering

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use payment_gateway::store::MongoStore;
use payment_gateway::{api, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Deadline for store connection and index setup at startup.
const BOOTSTRAP_DEADLINE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("payment_gateway=debug".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let store = tokio::time::timeout(BOOTSTRAP_DEADLINE, MongoStore::connect(&config))
        .await
        .context("store bootstrap timed out")?
        .context("store bootstrap failed")?;

    let state = api::AppState::new(Arc::new(store));
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.app_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "payment gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}
