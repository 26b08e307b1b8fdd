use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use stop_locator::config::LocatorConfig;
use stop_locator::lines::LineRegistry;
use stop_locator::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = LocatorConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    info!(
        lines = state.registry.lines().len(),
        routing = %config.routing.base_url,
        geocoding = %config.geocode.base_url,
        "services ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, "stop locator listening");
    info!("  GET    /health");
    info!("  GET    /lines");
    info!("  GET    /lines/:id/stops");
    info!("  POST   /lines/:id/rank");
    info!("  POST   /lines/:id/nearest-start");
    info!("  GET    /geocode/reverse?lat=..&lon=..");
    info!("  GET    /position, DELETE /position");

    axum::serve(listener, app).await?;
    Ok(())
}
