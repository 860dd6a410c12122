//! parkmybike-server: loads the facility dataset and serves the search API.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use parkmybike::config::Config;
use parkmybike::server::api::{router, ApiState};
use parkmybike::utils::dataset::{init_dataset, Dataset};
use parkmybike::utils::geocoder::NominatimGeocoder;
use parkmybike::CoordinateResolver;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();

    info!("[1/3] Loading dataset...");
    let dataset = Dataset::from_path(&config.dataset)
        .with_context(|| format!("loading {}", config.dataset.display()))?;
    let dataset = init_dataset(dataset).context("installing dataset")?;

    info!("[2/3] Building geocoder client...");
    let geocoder_config = config.geocoder();
    let geocoder = NominatimGeocoder::new(&geocoder_config).context("building geocoder client")?;
    let resolver = CoordinateResolver::new(geocoder, geocoder_config.timeout);

    info!("[3/3] Starting API...");
    let app = router(ApiState {
        dataset,
        resolver: Arc::new(resolver),
        search: config.search(),
    });
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!("Listening on http://{}", config.bind);

    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Shutdown signal received"); }
    }

    Ok(())
}
