use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walletsense::{
    api::start_server,
    backend::{FinanceBackend, HttpBackend, Session},
    config::Config,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!("🚀 WalletSense - API Server");
    info!("📍 Port: {}", config.port);
    info!("🔗 Backend: {}", config.backend_url);

    let backend: Arc<dyn FinanceBackend> = Arc::new(HttpBackend::from_config(&config)?);
    let app = Arc::new(AppState::new(Session::from(&config)));

    info!("✅ Session {} initialized", config.session_id);
    info!("📡 Starting API server...");

    start_server(app, backend, config.port).await?;

    Ok(())
}
