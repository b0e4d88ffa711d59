use std::net::SocketAddr;

use newsroom::{make_router, run_app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let router = make_router();
    tracing::info!("Server started on {}", addr);
    if let Err(error) = run_app(router, addr).await {
        tracing::error!("Error: {}", error);
    }
}
