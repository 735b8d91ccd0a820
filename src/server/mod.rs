pub mod handlers;
mod types;

pub use types::{ErrorResponse, InferenceResponse};

use crate::{Result, config::Config, llm::create_llm_client};
use axum::{Router, routing::post};
use handlers::AppState;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/inference", post(handlers::inference))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    let llm = create_llm_client(&config.llm)?;
    info!(
        "Using {} provider at {} with model {}",
        config.llm.provider, config.llm.base_url, config.llm.model
    );

    let app = router(AppState::new(llm, config.llm.model));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, gracefully shutting down");
}
