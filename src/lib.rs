#[macro_use]
extern crate tracing;

mod errors;
pub mod logging;

pub use errors::init_errors;
pub use logging::init_logging;
pub use mirth_exporter_config::{
    Args,
    Config,
};

use eyre::Context as _;
use mirth_exporter_collector::{
    CliCommand,
    Collector,
    ReportFetcher,
};
use mirth_exporter_http::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the collector from `config`. Nothing is spawned until the first scrape.
pub fn collector(config: &Config) -> Collector {
    let command = CliCommand::mirth_cli(&config.mccli.runtime, &config.mccli.jar_path, &config.mccli.config_path);
    Collector::new(ReportFetcher::new(command).with_timeout(config.mccli.timeout()))
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
    let config = Config::new(args).context("Failed to load configuration")?;
    config.validate()?;

    match config.mccli.timeout() {
        Some(timeout) => info!(?timeout, "CLI invocations are bounded"),
        None => warn!("CLI invocations are unbounded; a hung CLI blocks every following scrape"),
    }

    let app = create_router(Arc::new(collector(&config)), &config.telemetry_path);

    let listener = TcpListener::bind(config.listen_address)
        .await
        .wrap_err_with(|| format!("Failed to listen on {}", config.listen_address))?;
    info!(
        address = %config.listen_address,
        path = %config.telemetry_path,
        jar = %config.mccli.jar_path.display(),
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
