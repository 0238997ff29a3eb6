mod api_doc;
mod constants;
mod error;
mod handlers;
mod middleware;
mod setup;
mod state;
mod telemetry;
mod utils;

use shopfront_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, sweeper, routes)
    let (_state, router, sweeper) = crate::setup::initialize_app(config.clone()).await?;

    // Start the server
    crate::setup::server::start_server(&config, router, sweeper).await?;

    Ok(())
}
