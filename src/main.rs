use std::sync::Arc;

use anyhow::Result;
use listing_locale_gateway::{config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("listing_locale_gateway=info".parse()?),
        )
        .init();

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;

    let state = Arc::new(server::AppState::new(config)?);
    let app = server::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Locale gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
