use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info};
use trackor_bridge::{
    server::{create_router, ApiState},
    Settings, TrackorClient, WebhookIngestor,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Trackor bridge");

    let settings = Settings::from_env().context("failed to load OneVizion settings")?;
    let client = TrackorClient::from_settings(&settings)?;
    info!("Integration initialized for {}", client.base_url());

    let state = ApiState {
        ingestor: WebhookIngestor::new(client),
    };
    let app = create_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server stopped: {:?}", e);
    }

    Ok(())
}
