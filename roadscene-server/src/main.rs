use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use roadscene_core::create_city_model;
use roadscene_server::config::GeocoderProvider;
use roadscene_server::geocoder::{Geocoder, NominatimGeocoder, StaticGeocoder};
use roadscene_server::{AppConfig, AppState, build_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Route finder and incident dashboard server")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "roadscene.toml")]
    config: PathBuf,

    /// Overrides `server.bind` from the configuration file
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();
    info!("Loaded configuration from {}", args.config.display());

    let data = config.data.clone();
    let model = tokio::task::spawn_blocking(move || create_city_model(&data))
        .await
        .context("model loading task failed")?
        .context("failed to build the city model")?;

    let geocoder: Arc<dyn Geocoder> = match config.geocoder.provider {
        GeocoderProvider::Nominatim => Arc::new(
            NominatimGeocoder::new(&config.geocoder).context("failed to create geocoding client")?,
        ),
        GeocoderProvider::Static => {
            info!(
                "Using static geocoder with {} places",
                config.geocoder.places.len()
            );
            Arc::new(StaticGeocoder::from_config(&config.geocoder))
        }
    };

    let state = Arc::new(
        AppState::new(model, geocoder, &config).context("failed to prepare the dashboard")?,
    );
    let app = build_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!("Listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
