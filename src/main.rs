use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladokbridge::api::router;
use ladokbridge::config::AppConfig;
use ladokbridge::connectors::{
    CanvasHttpClient, EpokHttpClient, LadokHttpClient, StudentItsHttpClient,
};
use ladokbridge::services::RosterStore;
use ladokbridge::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ladokbridge=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env();

    let state = AppState {
        canvas: Arc::new(CanvasHttpClient::new(&config.api_base)?),
        studentits: Arc::new(StudentItsHttpClient::new(&config.api_base)?),
        ladok: Arc::new(LadokHttpClient::new(&config.api_base)?),
        epok: Arc::new(EpokHttpClient::new(&config.api_base)?),
        store: Arc::new(RwLock::new(RosterStore::new())),
        config: config.clone(),
    };

    let app = router(state);

    info!("gateway at {}", config.api_base);
    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
