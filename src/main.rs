// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use mill_reliability::application::event_detector::EventDetector;
use mill_reliability::application::reason_classifier::ReasonClassifier;
use mill_reliability::application::reliability_service::ReliabilityService;
use mill_reliability::infrastructure::config::{load_fleet_config, load_influx_config};
use mill_reliability::infrastructure::influx_repository::InfluxRepository;
use mill_reliability::presentation::app_state::AppState;
use mill_reliability::presentation::router::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let influx_config = load_influx_config().context("Failed to load config/influx")?;
    let fleet_config = load_fleet_config().context("Failed to load config/fleet")?;

    // Create reading source (infrastructure layer)
    let source = Arc::new(InfluxRepository::new(influx_config.influx));

    // Create services (application layer)
    let detector = EventDetector::new(fleet_config.downtime, ReasonClassifier::default());
    let reliability_service =
        ReliabilityService::new(source, fleet_config.mill_infos(), detector);

    match reliability_service.unmonitored_mills().await {
        Ok(missing) if !missing.is_empty() => {
            tracing::warn!("Configured mills with no data in the source: {:?}", missing)
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not list mills from the reading source: {:#}", e),
    }

    // Create application state and router (presentation layer)
    let state = Arc::new(AppState {
        reliability_service,
    });
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = fleet_config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", fleet_config.server.bind_addr))?;
    tracing::info!("Starting mill-reliability service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
