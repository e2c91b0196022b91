//! Entry point: load config and serve the channel auth and webhook endpoints.

use eventflit::config::{Config, ServerConfig};
use eventflit::{create_app, AppState, Client};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let server = ServerConfig::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    // Fail at startup rather than on the first request.
    let credentials = config.credentials()?;
    tracing::info!(app_id = %credentials.app_id(), host = %config.host, "client configured");

    let state = AppState::new(Client::new(config)?);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    tracing::info!(addr = %server.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(server.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
