use std::collections::HashSet;

use mock_server::BackendConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = BackendConfig::default();
    if let Ok(app_id) = std::env::var("MOCK_APP_ID") {
        config.app_id = app_id;
    }
    if let Ok(token) = std::env::var("MOCK_ACCESS_TOKEN") {
        config.tokens = HashSet::from([token]);
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, app_id = %config.app_id, "Mock backend listening");
    mock_server::run_with(listener, config).await
}
