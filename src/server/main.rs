//! Map gateway server.
//!
//! Serves place boundary lookups and decoded driving directions to the map
//! client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use juanmap::boundary::BoundaryResolver;
use juanmap::cache::TtlCache;
use juanmap::config::Config;
use juanmap::directions::{DirectionsProvider, GoogleDirectionsClient};
use juanmap::geocoding::{GeocodingProvider, NominatimClient};
use juanmap::route::RouteDecoder;

mod handlers;
use handlers::{
    boundary_handler, health_handler, not_found_handler, route_handler, AppState,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Map gateway for boundary lookup and route decoding")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Nominatim search endpoint (overrides config)
    #[arg(long)]
    nominatim_url: Option<String>,

    /// Google Directions endpoint (overrides config)
    #[arg(long)]
    directions_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    if let Some(url) = args.nominatim_url {
        config.geocoding.base_url = url;
    }
    if let Some(url) = args.directions_url {
        config.directions.base_url = url;
    }

    info!("JuanMap gateway");
    info!(
        "Geocoding via {}, directions via {}, cache TTL {}s, provider timeout {}s",
        config.geocoding.base_url,
        config.directions.base_url,
        config.cache.ttl_secs,
        config.request_timeout().as_secs()
    );

    let geocoder = NominatimClient::new(
        &config.geocoding.base_url,
        &config.geocoding.user_agent,
        config.request_timeout(),
    )
    .context("Failed to build geocoding client")?;

    let directions = GoogleDirectionsClient::new(
        &config.directions.base_url,
        config.directions_api_key(),
        config.request_timeout(),
    )
    .context("Failed to build directions client")?;

    let state = Arc::new(AppState {
        boundary: BoundaryResolver::new(geocoder, TtlCache::new(), config.cache_ttl()),
        route: RouteDecoder::new(directions),
    });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router<G, D>(state: Arc<AppState<G, D>>) -> Router
where
    G: GeocodingProvider + 'static,
    D: DirectionsProvider + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/boundary", get(boundary_handler::<G, D>))
        .route("/route", post(route_handler::<G, D>))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
