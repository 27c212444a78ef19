//! roster server binary.
//!
//! ```text
//! RUST_LOG=debug ROSTER_DATABASE=/var/lib/roster/roster.db roster
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roster::users::SqliteUserStore;
use roster::{Config, Server, routes};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "roster exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), roster::Error> {
    let config = Config::from_env()?;
    let store = Arc::new(SqliteUserStore::open(&config.database)?);
    info!(database = %config.database.display(), "user store ready");

    Server::bind(config.addr)
        .serve(routes::app(store, &config))
        .await
}
